use anyhow::{ensure, Result};

use crate::encoding::TextEncoding;
use crate::error::QuestScriptError;
use crate::reader::{BytesExt, Reader};
use crate::{Build, Episode};

/// The five packed header layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeaderKind {
    /// DC NTE
    Nte,
    /// DC proto / V1 / V2
    Dc,
    /// PC NTE / V2
    Pc,
    /// GC and Xbox V3 family
    Gc,
    /// BB V4
    Bb,
}

impl HeaderKind {
    pub fn size(self) -> usize {
        match self {
            HeaderKind::Nte => 0x30,
            HeaderKind::Dc | HeaderKind::Gc => 0x1D4,
            HeaderKind::Pc => 0x394,
            HeaderKind::Bb => 0x398,
        }
    }
}

const NAME_CHARS: usize = 0x20;
const SHORT_DESC_CHARS: usize = 0x80;
const LONG_DESC_CHARS: usize = 0x120;

/// Build-independent header contents. Fields a layout lacks keep their
/// defaults on decode and are ignored on emit.
#[derive(Clone, Debug)]
pub struct QuestMeta {
    pub code_offset: u32,
    pub function_table_offset: u32,
    pub size: u32,
    pub is_download: bool,
    /// effective language (override / clamp already applied)
    pub language: u8,
    pub quest_number: u16,
    pub episode: Episode,
    pub name: String,
    pub short_description: String,
    pub long_description: String,
    pub max_players: u8,
    pub joinable: bool,
}

impl Default for QuestMeta {
    fn default() -> Self {
        Self {
            code_offset: 0,
            function_table_offset: 0,
            size: 0,
            is_download: false,
            language: 1,
            quest_number: 0,
            episode: Episode::Episode1,
            name: String::new(),
            short_description: String::new(),
            long_description: String::new(),
            max_players: 4,
            joinable: false,
        }
    }
}

pub fn parse(
    data: &[u8],
    build: Build,
    language_override: Option<u8>,
) -> Result<QuestMeta> {
    let kind = build.header_kind()?;
    ensure!(
        data.len() >= kind.size(),
        QuestScriptError::MalformedBinary {
            offset: 0,
            reason: format!(
                "{} byte(s) is too short for a {} header of {:#X}",
                data.len(),
                build.name(),
                kind.size(),
            ),
        }
    );
    let mut r = Reader::new(data);
    let mut meta = QuestMeta {
        code_offset: r.read_u32()?,
        function_table_offset: r.read_u32()?,
        size: r.read_u32()?,
        ..QuestMeta::default()
    };
    let _unused = r.read_u32()?;

    match kind {
        HeaderKind::Nte => {
            meta.language = build.effective_language(0, language_override);
            let encoding = build.text_encoding(meta.language);
            meta.name = read_text8(&mut r, NAME_CHARS, encoding)?;
        }
        HeaderKind::Dc => {
            meta.is_download = r.read_u8()? != 0;
            let header_language = r.read_u8()?;
            meta.quest_number = r.read_u16()?;
            meta.language =
                build.effective_language(header_language, language_override);
            let encoding = build.text_encoding(meta.language);
            meta.name = read_text8(&mut r, NAME_CHARS, encoding)?;
            meta.short_description =
                read_text8(&mut r, SHORT_DESC_CHARS, encoding)?;
            meta.long_description =
                read_text8(&mut r, LONG_DESC_CHARS, encoding)?;
        }
        HeaderKind::Pc => {
            meta.is_download = r.read_u8()? != 0;
            let header_language = r.read_u8()?;
            meta.quest_number = r.read_u16()?;
            meta.language =
                build.effective_language(header_language, language_override);
            meta.name = read_text16(&mut r, NAME_CHARS)?;
            meta.short_description = read_text16(&mut r, SHORT_DESC_CHARS)?;
            meta.long_description = read_text16(&mut r, LONG_DESC_CHARS)?;
        }
        HeaderKind::Gc => {
            meta.is_download = r.read_u8()? != 0;
            let header_language = r.read_u8()?;
            meta.quest_number = r.read_u8()?.into();
            meta.episode = Episode::from_header_byte(r.read_u8()?)?;
            meta.language =
                build.effective_language(header_language, language_override);
            let encoding = build.text_encoding(meta.language);
            meta.name = read_text8(&mut r, NAME_CHARS, encoding)?;
            meta.short_description =
                read_text8(&mut r, SHORT_DESC_CHARS, encoding)?;
            meta.long_description =
                read_text8(&mut r, LONG_DESC_CHARS, encoding)?;
        }
        HeaderKind::Bb => {
            meta.quest_number = r.read_u16()?;
            let _unused2 = r.read_u16()?;
            meta.episode = Episode::from_header_byte(r.read_u8()?)?;
            meta.max_players = r.read_u8()?;
            meta.joinable = r.read_u8()? != 0;
            let _unused3 = r.read_u8()?;
            meta.language = build.effective_language(1, language_override);
            meta.name = read_text16(&mut r, NAME_CHARS)?;
            meta.short_description = read_text16(&mut r, SHORT_DESC_CHARS)?;
            meta.long_description = read_text16(&mut r, LONG_DESC_CHARS)?;
        }
    }
    debug_assert_eq!(r.pos(), kind.size());

    let total = data.len();
    let (code, table, size) = (
        meta.code_offset as usize,
        meta.function_table_offset as usize,
        meta.size as usize,
    );
    ensure!(
        kind.size() <= code && code <= table && table <= size && size <= total,
        QuestScriptError::MalformedBinary {
            offset: 0,
            reason: format!(
                "header regions out of order: code {code:#X}, \
                 table {table:#X}, size {size:#X}, buffer {total:#X}"
            ),
        }
    );
    Ok(meta)
}

pub fn emit(meta: &QuestMeta, build: Build) -> Result<Vec<u8>> {
    let kind = build.header_kind()?;
    let encoding = build.text_encoding(meta.language);
    let mut out = Vec::with_capacity(kind.size());
    out.put_u32l(meta.code_offset);
    out.put_u32l(meta.function_table_offset);
    out.put_u32l(meta.size);
    out.put_u32l(0);
    match kind {
        HeaderKind::Nte => {
            put_text8(&mut out, &meta.name, NAME_CHARS, encoding);
        }
        HeaderKind::Dc | HeaderKind::Gc => {
            out.put_u8(meta.is_download.into());
            out.put_u8(meta.language);
            if kind == HeaderKind::Dc {
                out.put_u16l(meta.quest_number);
            } else {
                out.put_u8(meta.quest_number as u8);
                out.put_u8(meta.episode.into());
            }
            put_text8(&mut out, &meta.name, NAME_CHARS, encoding);
            put_text8(
                &mut out,
                &meta.short_description,
                SHORT_DESC_CHARS,
                encoding,
            );
            put_text8(
                &mut out,
                &meta.long_description,
                LONG_DESC_CHARS,
                encoding,
            );
        }
        HeaderKind::Pc => {
            out.put_u8(meta.is_download.into());
            out.put_u8(meta.language);
            out.put_u16l(meta.quest_number);
            put_text16(&mut out, &meta.name, NAME_CHARS);
            put_text16(&mut out, &meta.short_description, SHORT_DESC_CHARS);
            put_text16(&mut out, &meta.long_description, LONG_DESC_CHARS);
        }
        HeaderKind::Bb => {
            out.put_u16l(meta.quest_number);
            out.put_u16l(0);
            out.put_u8(meta.episode.into());
            out.put_u8(meta.max_players);
            out.put_u8(meta.joinable.into());
            out.put_u8(0);
            put_text16(&mut out, &meta.name, NAME_CHARS);
            put_text16(&mut out, &meta.short_description, SHORT_DESC_CHARS);
            put_text16(&mut out, &meta.long_description, LONG_DESC_CHARS);
        }
    }
    debug_assert_eq!(out.len(), kind.size());
    Ok(out)
}

/// Fixed-width NUL-padded 8-bit text field.
fn read_text8(
    r: &mut Reader,
    len: usize,
    encoding: TextEncoding,
) -> Result<String> {
    let raw = r.read_bytes(len)?;
    let end = raw.iter().position(|b| *b == 0).unwrap_or(len);
    Ok(encoding.decode(&raw[..end]))
}

/// Fixed-width NUL-padded UTF-16LE text field; `units` 16-bit code units.
fn read_text16(r: &mut Reader, units: usize) -> Result<String> {
    let raw = r.read_bytes(units * 2)?;
    let end = raw
        .chunks_exact(2)
        .position(|c| c == [0, 0])
        .map(|p| p * 2)
        .unwrap_or(raw.len());
    Ok(TextEncoding::Utf16Le.decode(&raw[..end]))
}

fn put_text8(
    out: &mut Vec<u8>,
    text: &str,
    len: usize,
    encoding: TextEncoding,
) {
    let mut bytes = encoding.encode(text);
    bytes.truncate(len);
    bytes.resize(len, 0);
    out.extend_from_slice(&bytes);
}

fn put_text16(out: &mut Vec<u8>, text: &str, units: usize) {
    let mut bytes = TextEncoding::Utf16Le.encode(text);
    bytes.truncate(units * 2);
    bytes.resize(units * 2, 0);
    out.extend_from_slice(&bytes);
}
