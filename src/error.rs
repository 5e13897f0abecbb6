use thiserror::Error;

/// The failure kinds surfaced by the toolchain. Everything travels inside
/// [`anyhow::Error`]; callers that care about the kind downcast to this.
#[derive(Debug, Error)]
pub enum QuestScriptError {
    #[error("unknown or unsupported build: {0}")]
    UnknownBuild(String),
    #[error("missing required directive: {0}")]
    MissingDirective(&'static str),
    #[error("block comment is not terminated")]
    UnterminatedComment,
    #[error("duplicate label name: {0}")]
    DuplicateLabel(String),
    #[error("duplicate function-table index {index} ({label})")]
    DuplicateIndex { label: String, index: u32 },
    #[error("label is never defined: {0}")]
    UndefinedLabel(String),
    #[error("unknown opcode mnemonic for this build: {0}")]
    UnknownMnemonic(String),
    #[error("opcode {mnemonic} takes {expected} argument(s), {got} given")]
    ArgCountMismatch {
        mnemonic: String,
        expected: usize,
        got: usize,
    },
    #[error("argument expects {expected}, got `{got}`")]
    ArgTypeMismatch {
        expected: &'static str,
        got: String,
    },
    #[error("register constraint cannot be satisfied: {0}")]
    RegisterConflict(String),
    #[error("malformed binary at offset {offset:#X}: {reason}")]
    MalformedBinary { offset: usize, reason: String },
    #[error("function 0 selects more than one episode")]
    MultipleEpisodes,
    #[error("no native assembler available for {0}")]
    ExternalAssemblerMissing(&'static str),
}

impl QuestScriptError {
    pub(crate) fn malformed(
        offset: usize,
        reason: impl Into<String>,
    ) -> anyhow::Error {
        Self::MalformedBinary {
            offset,
            reason: reason.into(),
        }
        .into()
    }
}
