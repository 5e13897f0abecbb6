use crate::DisassembleArgs;

use std::io::Write;

use anyhow::Result;

use qst_rs::DisassembleOptions;

pub fn disassemble_quest(args: &DisassembleArgs) -> Result<()> {
    let data = std::fs::read(&args.input)?;
    let listing = qst_rs::disassemble(
        &data,
        args.version,
        &DisassembleOptions {
            language_override: args.language,
            annotated: args.annotated,
            qedit_names: args.qedit_names,
        },
    )?;
    match &args.output {
        Some(path) => std::fs::write(path, listing)?,
        None => std::io::stdout().write_all(listing.as_bytes())?,
    }
    Ok(())
}
