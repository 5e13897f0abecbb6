use std::collections::HashMap;
use std::sync::OnceLock;

use anyhow::{anyhow, Result};

use crate::Build;

pub mod flag;
mod table;

pub use table::OPCODES;

/// Wire shape of one opcode argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArgKind {
    /// 16-bit function-table index
    Label16,
    /// 32-bit function-table index
    Label32,
    /// 8-bit count, then that many 16-bit indices
    Label16Set,
    /// 8-bit register number
    Reg,
    /// 8-bit count, then that many 8-bit register numbers
    RegSet,
    /// one 8-bit start register, `count` consecutive
    RegSetFixed,
    /// 32-bit register number, upper bytes zero
    Reg32,
    /// one 32-bit start register, `count` consecutive
    Reg32SetFixed,
    Int8,
    Int16,
    Int32,
    Float32,
    /// NUL-terminated, encoding decided by build + language
    CString,
}

impl ArgKind {
    pub fn describe(self) -> &'static str {
        match self {
            ArgKind::Label16 | ArgKind::Label32 => "a label",
            ArgKind::Label16Set => "a label set [a, b, ...]",
            ArgKind::Reg | ArgKind::Reg32 => "a register",
            ArgKind::RegSet => "a register set [rA, rB, ...]",
            ArgKind::RegSetFixed | ArgKind::Reg32SetFixed => {
                "consecutive registers (rA, rB, ...)"
            }
            ArgKind::Int8 | ArgKind::Int16 | ArgKind::Int32 => "an integer",
            ArgKind::Float32 => "a float",
            ArgKind::CString => "a string",
        }
    }
}

/// Semantic type a label argument assigns to its target bytes. A label
/// accumulates one flag per distinct kind it is referenced as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataKind {
    /// argument is not a label
    None,
    /// decode the target as code
    Script,
    Data,
    CString,
    PlayerStats,
    PlayerVisualConfig,
    ResistData,
    AttackData,
    MovementData,
    /// PRS-compressed image
    ImageData,
    /// array of 4xf32 records
    UnknownF8F2Data,
}

#[derive(Clone, Copy, Debug)]
pub struct ArgDef {
    pub kind: ArgKind,
    /// member count for the fixed register sets
    pub count: u8,
    pub data_type: DataKind,
    pub name: Option<&'static str>,
}

impl ArgDef {
    pub const fn plain(kind: ArgKind) -> Self {
        Self {
            kind,
            count: 0,
            data_type: DataKind::None,
            name: None,
        }
    }

    pub const fn label16(data_type: DataKind) -> Self {
        Self {
            kind: ArgKind::Label16,
            count: 0,
            data_type,
            name: None,
        }
    }

    pub const fn label32(data_type: DataKind) -> Self {
        Self {
            kind: ArgKind::Label32,
            count: 0,
            data_type,
            name: None,
        }
    }

    pub const fn label16_set(data_type: DataKind) -> Self {
        Self {
            kind: ArgKind::Label16Set,
            count: 0,
            data_type,
            name: None,
        }
    }

    pub const fn reg_set_fixed(count: u8) -> Self {
        Self {
            kind: ArgKind::RegSetFixed,
            count,
            data_type: DataKind::None,
            name: None,
        }
    }

    pub const fn reg32_set_fixed(count: u8) -> Self {
        Self {
            kind: ArgKind::Reg32SetFixed,
            count,
            data_type: DataKind::None,
            name: None,
        }
    }

    pub const fn named(self, name: &'static str) -> Self {
        Self {
            name: Some(name),
            ..self
        }
    }

    pub fn is_label(&self) -> bool {
        matches!(
            self.kind,
            ArgKind::Label16 | ArgKind::Label32 | ArgKind::Label16Set
        )
    }

    pub fn is_reg(&self) -> bool {
        matches!(
            self.kind,
            ArgKind::Reg
                | ArgKind::Reg32
                | ArgKind::RegSet
                | ArgKind::RegSetFixed
                | ArgKind::Reg32SetFixed
        )
    }
}

/// One row of the opcode dictionary.
#[derive(Clone, Copy, Debug)]
pub struct OpDef {
    pub opcode: u16,
    pub name: &'static str,
    /// alternate mnemonic accepted by the assembler
    pub qedit_name: Option<&'static str>,
    pub args: &'static [ArgDef],
    pub flags: u16,
}

impl OpDef {
    pub fn is(&self, flag: u16) -> bool {
        self.flags & flag != 0
    }

    pub fn supports(&self, build: Build) -> bool {
        build
            .version_flag()
            .is_some_and(|bit| self.flags & bit != 0)
    }

    pub fn display_name(&self, qedit: bool) -> &'static str {
        if qedit {
            self.qedit_name.unwrap_or(self.name)
        } else {
            self.name
        }
    }

    /// Opcodes with high byte 0 are one byte on the wire; the 0xF8/0xF9
    /// family is two bytes, big-endian.
    pub fn wire_size(&self) -> usize {
        if self.opcode > 0xFF {
            2
        } else {
            1
        }
    }
}

/// Per-build lookup maps, derived from [`OPCODES`] on first use.
#[derive(Debug)]
pub struct BuildIndex {
    by_opcode: HashMap<u16, &'static OpDef>,
    by_name: HashMap<&'static str, &'static OpDef>,
}

impl BuildIndex {
    fn build(build: Build) -> Result<Self, String> {
        let mut by_opcode = HashMap::new();
        let mut by_name = HashMap::new();
        for def in OPCODES {
            if !def.supports(build) {
                continue;
            }
            if by_opcode.insert(def.opcode, def).is_some() {
                return Err(format!(
                    "duplicate opcode {:04X} for build {build:?}",
                    def.opcode
                ));
            }
            let mut names = vec![def.name];
            names.extend(def.qedit_name);
            for name in names {
                if let Some(prev) =
                    by_name.insert(name, def).filter(|p| p.opcode != def.opcode)
                {
                    return Err(format!(
                        "mnemonic {name} of {:04X} already names {:04X} for build {build:?}",
                        def.opcode, prev.opcode
                    ));
                }
            }
        }
        Ok(Self { by_opcode, by_name })
    }

    pub fn by_opcode(&self, opcode: u16) -> Option<&'static OpDef> {
        self.by_opcode.get(&opcode).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&'static OpDef> {
        self.by_name.get(name).copied()
    }
}

type IndexSlot = OnceLock<Result<BuildIndex, String>>;

/// The per-build index, written once and thereafter read-only. A duplicate
/// row poisons the build's slot and every lookup reports it.
pub fn index_for(build: Build) -> Result<&'static BuildIndex> {
    const EMPTY: IndexSlot = OnceLock::new();
    static INDEXES: [IndexSlot; Build::COUNT] = [EMPTY; Build::COUNT];
    match INDEXES[build as usize].get_or_init(|| BuildIndex::build(build)) {
        Ok(index) => Ok(index),
        Err(message) => Err(anyhow!("opcode dictionary: {message}")),
    }
}
