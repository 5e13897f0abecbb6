use crate::EpisodeArgs;

use anyhow::Result;

pub fn show_episode(args: &EpisodeArgs) -> Result<()> {
    let data = std::fs::read(&args.input)?;
    let episode = qst_rs::find_episode(&data, args.version, args.language)?;
    println!("{episode}");
    Ok(())
}
