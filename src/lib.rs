#![forbid(unsafe_code)]
pub mod asm;
pub mod disasm;
pub mod encoding;
pub mod episode;
pub mod error;
pub mod header;
pub mod native;
pub mod opcode;
pub mod prs;
pub(crate) mod reader;

#[cfg(test)]
mod test;

use std::path::PathBuf;

use anyhow::Result;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::encoding::TextEncoding;
use crate::error::QuestScriptError;
use crate::header::HeaderKind;
use crate::native::AssemblerSet;
use crate::opcode::flag;

/// One release variant of the target game. The build decides the header
/// layout, the text encoding, and which opcode rows are live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Build {
    DcNte,
    DcProto,
    DcV1,
    DcV2,
    PcNte,
    PcV2,
    GcNte,
    GcV3,
    GcEp3Nte,
    GcEp3,
    XbV3,
    BbV4,
    // the patch environments carry no quests; reserved so the numbering
    // matches the server's build table
    PcPatch,
    BbPatch,
}

pub const ALL_BUILDS: [Build; 12] = [
    Build::DcNte,
    Build::DcProto,
    Build::DcV1,
    Build::DcV2,
    Build::PcNte,
    Build::PcV2,
    Build::GcNte,
    Build::GcV3,
    Build::GcEp3Nte,
    Build::GcEp3,
    Build::XbV3,
    Build::BbV4,
];

impl Build {
    pub const COUNT: usize = 14;

    pub fn name(self) -> &'static str {
        match self {
            Build::DcNte => "DC_NTE",
            Build::DcProto => "DC_PROTO",
            Build::DcV1 => "DC_V1",
            Build::DcV2 => "DC_V2",
            Build::PcNte => "PC_NTE",
            Build::PcV2 => "PC_V2",
            Build::GcNte => "GC_NTE",
            Build::GcV3 => "GC_V3",
            Build::GcEp3Nte => "GC_EP3_NTE",
            Build::GcEp3 => "GC_EP3",
            Build::XbV3 => "XB_V3",
            Build::BbV4 => "BB_V4",
            Build::PcPatch => "PC_PATCH",
            Build::BbPatch => "BB_PATCH",
        }
    }

    /// The build named by a `.version` directive or a CLI flag.
    pub fn from_name(name: &str) -> Result<Self> {
        let build = match name {
            "DC_NTE" => Build::DcNte,
            "DC_PROTO" | "DC_11_2000" => Build::DcProto,
            "DC_V1" => Build::DcV1,
            "DC_V2" => Build::DcV2,
            "PC_NTE" => Build::PcNte,
            "PC_V2" => Build::PcV2,
            "GC_NTE" => Build::GcNte,
            "GC_V3" => Build::GcV3,
            "GC_EP3_NTE" => Build::GcEp3Nte,
            "GC_EP3" => Build::GcEp3,
            "XB_V3" => Build::XbV3,
            "BB_V4" => Build::BbV4,
            other => {
                return Err(
                    QuestScriptError::UnknownBuild(other.to_owned()).into()
                )
            }
        };
        Ok(build)
    }

    /// This build's bit in the opcode-row version mask. `None` for the
    /// inert patch placeholders.
    pub fn version_flag(self) -> Option<u16> {
        match self {
            Build::DcNte => Some(flag::F_DC_NTE),
            Build::DcProto => Some(flag::F_DC_PROTO),
            Build::DcV1 => Some(flag::F_DC_V1),
            Build::DcV2 => Some(flag::F_DC_V2),
            Build::PcNte => Some(flag::F_PC_NTE),
            Build::PcV2 => Some(flag::F_PC_V2),
            Build::GcNte => Some(flag::F_GC_NTE),
            Build::GcV3 => Some(flag::F_GC_V3),
            Build::GcEp3Nte => Some(flag::F_GC_EP3_NTE),
            Build::GcEp3 => Some(flag::F_GC_EP3),
            Build::XbV3 => Some(flag::F_XB_V3),
            Build::BbV4 => Some(flag::F_BB_V4),
            Build::PcPatch | Build::BbPatch => None,
        }
    }

    pub(crate) fn require_active(self) -> Result<u16> {
        self.version_flag().ok_or_else(|| {
            QuestScriptError::UnknownBuild(self.name().to_owned()).into()
        })
    }

    /// Whether this build consumes `F_ARGS` opcode arguments from the
    /// push stack.
    pub fn has_args(self) -> bool {
        self.version_flag()
            .is_some_and(|bit| bit & flag::F_HAS_ARGS != 0)
    }

    pub fn header_kind(self) -> Result<HeaderKind> {
        let kind = match self {
            Build::DcNte => HeaderKind::Nte,
            Build::DcProto | Build::DcV1 | Build::DcV2 => HeaderKind::Dc,
            Build::PcNte | Build::PcV2 => HeaderKind::Pc,
            Build::GcNte
            | Build::GcV3
            | Build::GcEp3Nte
            | Build::GcEp3
            | Build::XbV3 => HeaderKind::Gc,
            Build::BbV4 => HeaderKind::Bb,
            Build::PcPatch | Build::BbPatch => {
                return Err(QuestScriptError::UnknownBuild(
                    self.name().to_owned(),
                )
                .into())
            }
        };
        Ok(kind)
    }

    /// C-string encoding for the given effective language.
    pub fn text_encoding(self, language: u8) -> TextEncoding {
        match self {
            Build::PcNte | Build::PcV2 | Build::BbV4 => TextEncoding::Utf16Le,
            _ if language == 0 => TextEncoding::ShiftJis,
            _ => TextEncoding::Latin1,
        }
    }

    /// Highest language byte the build shipped with.
    pub fn max_language(self) -> u8 {
        match self {
            Build::DcNte => 0,
            _ => 4,
        }
    }

    /// Override wins when not 0xFF; a header language out of the build's
    /// range falls back to 1.
    pub fn effective_language(
        self,
        header_language: u8,
        language_override: Option<u8>,
    ) -> u8 {
        match language_override {
            Some(language) if language != 0xFF => language,
            _ if header_language <= self.max_language() => header_language,
            _ => {
                tracing::warn!(
                    header_language,
                    build = self.name(),
                    "header language out of range, using 1"
                );
                1
            }
        }
    }
}

/// Quest episode, as stored in the V3/V4 header byte and selected by the
/// `set_episode` opcode.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    TryFromPrimitive,
    IntoPrimitive,
)]
#[repr(u8)]
pub enum Episode {
    Episode1 = 0,
    Episode2 = 1,
    Episode4 = 2,
}

impl Episode {
    /// Header episode byte; 0xFF also means Episode 1.
    pub fn from_header_byte(value: u8) -> Result<Self> {
        if value == 0xFF {
            return Ok(Episode::Episode1);
        }
        Episode::try_from(value).map_err(|_| {
            QuestScriptError::malformed(
                0,
                format!("invalid episode byte {value:#04X}"),
            )
        })
    }
}

impl std::fmt::Display for Episode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Episode::Episode1 => write!(f, "Episode 1"),
            Episode::Episode2 => write!(f, "Episode 2"),
            Episode::Episode4 => write!(f, "Episode 4"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DisassembleOptions {
    /// Use this language instead of the header byte (0xFF means no
    /// override).
    pub language_override: Option<u8>,
    /// Emit offsets, hex columns and typed data dumps instead of
    /// round-trippable source.
    pub annotated: bool,
    /// Prefer the alternate qedit mnemonics where a row has one.
    pub qedit_names: bool,
}

#[derive(Debug, Default)]
pub struct AssembleOptions {
    /// Target this build regardless of the `.version` directive.
    pub build_override: Option<Build>,
    /// Directory searched by `.include_bin` / `.include_native`.
    pub include_dir: Option<PathBuf>,
    /// Native-CPU backends for `.include_native`.
    pub native: AssemblerSet,
}

#[derive(Clone, Debug)]
pub struct AssembledQuest {
    /// Build actually targeted (from `.version` or the override).
    pub build: Build,
    pub data: Vec<u8>,
}

/// Disassemble a compiled quest for `build` into a textual listing.
pub fn disassemble(
    data: &[u8],
    build: Build,
    opts: &DisassembleOptions,
) -> Result<String> {
    disasm::disassemble(data, build, opts)
}

/// Assemble a textual listing into a compiled quest.
pub fn assemble(text: &str, opts: &AssembleOptions) -> Result<AssembledQuest> {
    asm::assemble(text, opts)
}

/// Statically determine which episode a compiled quest targets.
pub fn find_episode(
    data: &[u8],
    build: Build,
    language_override: Option<u8>,
) -> Result<Episode> {
    episode::find_episode(data, build, language_override)
}
