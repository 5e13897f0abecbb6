//! Seam for the native-CPU assemblers backing `.include_native`. The
//! backends live outside this crate; they are injected by capability and
//! expose a single text-to-bytes contract.

use std::collections::HashMap;

use anyhow::Result;

use crate::error::QuestScriptError;
use crate::Build;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CpuFamily {
    /// GC builds
    Ppc,
    /// PC, Xbox and BB builds
    X86,
    /// DC builds
    Sh4,
}

impl CpuFamily {
    pub fn for_build(build: Build) -> Self {
        match build {
            Build::DcNte
            | Build::DcProto
            | Build::DcV1
            | Build::DcV2 => CpuFamily::Sh4,
            Build::GcNte
            | Build::GcV3
            | Build::GcEp3Nte
            | Build::GcEp3 => CpuFamily::Ppc,
            _ => CpuFamily::X86,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CpuFamily::Ppc => "PPC",
            CpuFamily::X86 => "x86",
            CpuFamily::Sh4 => "SH4",
        }
    }
}

pub trait NativeAssembler {
    fn assemble(&self, text: &str) -> Result<Vec<u8>>;
}

/// The backends available to one `assemble` call. Empty by default;
/// `.include_native` against a missing slot fails.
#[derive(Default)]
pub struct AssemblerSet {
    slots: HashMap<CpuFamily, Box<dyn NativeAssembler>>,
}

impl AssemblerSet {
    pub fn register(
        &mut self,
        family: CpuFamily,
        assembler: Box<dyn NativeAssembler>,
    ) {
        self.slots.insert(family, assembler);
    }

    pub fn assemble(&self, family: CpuFamily, text: &str) -> Result<Vec<u8>> {
        match self.slots.get(&family) {
            Some(assembler) => assembler.assemble(text),
            None => Err(QuestScriptError::ExternalAssemblerMissing(
                family.name(),
            )
            .into()),
        }
    }
}

impl std::fmt::Debug for AssemblerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssemblerSet")
            .field("families", &self.slots.keys().collect::<Vec<_>>())
            .finish()
    }
}
