use crate::AssembleArgs;

use anyhow::Result;

use qst_rs::AssembleOptions;

pub fn assemble_quest(args: &AssembleArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.input)?;
    let quest = qst_rs::assemble(
        &text,
        &AssembleOptions {
            build_override: args.version,
            include_dir: args.include_dir.clone(),
            ..AssembleOptions::default()
        },
    )?;
    std::fs::write(&args.output, &quest.data)?;
    eprintln!(
        "{}: {} byte(s) for {}",
        args.output.display(),
        quest.data.len(),
        quest.build.name()
    );
    Ok(())
}
