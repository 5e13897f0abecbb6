use std::collections::BTreeSet;

use anyhow::Result;

use crate::disasm::read_opcode;
use crate::encoding::TextEncoding;
use crate::error::QuestScriptError;
use crate::header;
use crate::opcode::{self, flag, ArgDef, ArgKind, BuildIndex};
use crate::reader::Reader;
use crate::{Build, Episode};

/// Linearly decode function 0 and collect every episode the script
/// selects. Exactly one hit wins; none falls back to the header; more
/// than one is an error. Decode failures fall back to the header too.
pub fn find_episode(
    data: &[u8],
    build: Build,
    language_override: Option<u8>,
) -> Result<Episode> {
    build.require_active()?;
    let index = opcode::index_for(build)?;
    let meta = header::parse(data, build, language_override)?;
    let code =
        &data[meta.code_offset as usize..meta.function_table_offset as usize];

    let table_len =
        (meta.size as usize - meta.function_table_offset as usize) / 4;
    if table_len == 0 {
        return Ok(meta.episode);
    }
    let entry = Reader::new(data)
        .sub(meta.function_table_offset as usize, 4)?
        .read_u32()?;
    if entry as usize >= code.len() {
        tracing::warn!(entry, "function 0 has no valid entry offset");
        return Ok(meta.episode);
    }

    let walk = Walk {
        build,
        index,
        encoding: build.text_encoding(meta.language),
        code,
    };
    let mut episodes = BTreeSet::new();
    let mut offset = entry as usize;
    let mut int_stack: Vec<Option<u32>> = Vec::new();
    loop {
        match walk.step(offset, &mut int_stack) {
            Ok(step) => {
                if let Some(value) = step.episode_value {
                    episodes.insert(episode_from_literal(value)?);
                }
                match step.next {
                    Some(next) if next < code.len() => offset = next,
                    _ => break,
                }
            }
            Err(err) => {
                tracing::warn!(
                    offset,
                    "episode walk stopped, using the header episode: {err:#}"
                );
                return Ok(meta.episode);
            }
        }
    }

    let mut found = episodes.into_iter();
    match (found.next(), found.next()) {
        (Some(episode), None) => Ok(episode),
        (None, None) => Ok(meta.episode),
        _ => Err(QuestScriptError::MultipleEpisodes.into()),
    }
}

fn episode_from_literal(value: u32) -> Result<Episode> {
    u8::try_from(value)
        .ok()
        .and_then(|v| Episode::try_from(v).ok())
        .ok_or_else(|| {
            QuestScriptError::malformed(
                0,
                format!("invalid episode literal {value:#X}"),
            )
        })
}

struct Step {
    next: Option<usize>,
    episode_value: Option<u32>,
}

struct Walk<'a> {
    build: Build,
    index: &'static BuildIndex,
    encoding: TextEncoding,
    code: &'a [u8],
}

impl Walk<'_> {
    fn step(
        &self,
        offset: usize,
        int_stack: &mut Vec<Option<u32>>,
    ) -> Result<Step> {
        let mut r = Reader::new(self.code);
        r.seek(offset)?;
        let op = read_opcode(&mut r)?;
        let def = self.index.by_opcode(op).ok_or_else(|| {
            QuestScriptError::malformed(
                offset,
                format!("unknown opcode {op:04X}"),
            )
        })?;

        let mut episode_value = None;
        let mut pushed_int = None;
        if def.is(flag::F_ARGS) && self.build.has_args() {
            // arguments were pushed; nothing to skip on the wire
            if def.is(flag::F_SET_EPISODE)
                && int_stack.len() == def.args.len()
            {
                for (arg, value) in def.args.iter().zip(int_stack.iter()) {
                    if arg.kind == ArgKind::Int32 {
                        episode_value = *value;
                    }
                }
            }
        } else {
            for arg in def.args {
                let value = self.skip_arg(&mut r, arg)?;
                pushed_int = value;
                if arg.kind == ArgKind::Int32 && def.is(flag::F_SET_EPISODE) {
                    episode_value = value;
                }
            }
        }

        if def.is(flag::F_PASS) {
            int_stack.push(pushed_int);
        } else {
            int_stack.clear();
        }

        Ok(Step {
            next: (!def.is(flag::F_RET)).then_some(r.pos()),
            episode_value,
        })
    }

    /// Advance past one argument by the disassembler's rules; integers
    /// report their value so push primitives can be tracked.
    fn skip_arg(&self, r: &mut Reader, arg: &ArgDef) -> Result<Option<u32>> {
        match arg.kind {
            ArgKind::Label16 => r.skip(2).map(|_| None),
            ArgKind::Label32 | ArgKind::Reg32 | ArgKind::Reg32SetFixed => {
                r.skip(4).map(|_| None)
            }
            ArgKind::Label16Set => {
                let count = r.read_u8()?;
                r.skip(usize::from(count) * 2).map(|_| None)
            }
            ArgKind::Reg | ArgKind::RegSetFixed => r.skip(1).map(|_| None),
            ArgKind::RegSet => {
                let count = r.read_u8()?;
                r.skip(count.into()).map(|_| None)
            }
            ArgKind::Int8 => Ok(Some(r.read_u8()?.into())),
            ArgKind::Int16 => Ok(Some(r.read_u16()?.into())),
            ArgKind::Int32 => Ok(Some(r.read_u32()?)),
            ArgKind::Float32 => r.skip(4).map(|_| None),
            ArgKind::CString => {
                if self.encoding == TextEncoding::Utf16Le {
                    r.read_cstr_utf16_units().map(|_| None)
                } else {
                    r.read_cstr_bytes().map(|_| None)
                }
            }
        }
    }
}
