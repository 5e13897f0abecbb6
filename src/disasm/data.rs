//! Structured dumps for typed data labels, one section per inferred type.
//! Everything renders as comments; the raw bytes stay on `.data` lines.

use crate::encoding::TextEncoding;
use crate::opcode::DataKind;
use crate::prs;
use crate::reader::Reader;

pub(crate) fn render_dump(
    kind: DataKind,
    bytes: &[u8],
    encoding: TextEncoding,
    lines: &mut Vec<String>,
) {
    match kind {
        DataKind::Data => {
            lines.push(format!("  // raw data ({} byte(s))", bytes.len()));
        }
        DataKind::CString => dump_cstring(bytes, encoding, lines),
        DataKind::PlayerStats => dump_struct(
            "PlayerStats",
            bytes,
            &[
                ("atp", FieldKind::U16),
                ("mst", FieldKind::U16),
                ("evp", FieldKind::U16),
                ("hp", FieldKind::U16),
                ("dfp", FieldKind::U16),
                ("ata", FieldKind::U16),
                ("lck", FieldKind::U16),
            ],
            lines,
        ),
        DataKind::PlayerVisualConfig => dump_struct(
            "PlayerVisualConfig",
            bytes,
            &[
                ("name", FieldKind::Bytes(0x10)),
                ("name_color", FieldKind::U32),
                ("extra_model", FieldKind::U8),
                ("unused", FieldKind::Bytes(0x0B)),
                ("name_color_checksum", FieldKind::U32),
                ("section_id", FieldKind::U8),
                ("char_class", FieldKind::U8),
                ("validation_flags", FieldKind::U8),
                ("version", FieldKind::U8),
                ("class_flags", FieldKind::U32),
                ("costume", FieldKind::U16),
                ("skin", FieldKind::U16),
                ("face", FieldKind::U16),
                ("head", FieldKind::U16),
                ("hair", FieldKind::U16),
                ("hair_r", FieldKind::U16),
                ("hair_g", FieldKind::U16),
                ("hair_b", FieldKind::U16),
                ("proportion_x", FieldKind::F32),
                ("proportion_y", FieldKind::F32),
            ],
            lines,
        ),
        DataKind::ResistData => dump_struct(
            "ResistData",
            bytes,
            &[
                ("evp_bonus", FieldKind::U16),
                ("efr", FieldKind::U16),
                ("eic", FieldKind::U16),
                ("eth", FieldKind::U16),
                ("elt", FieldKind::U16),
                ("edk", FieldKind::U16),
                ("unknown_a6", FieldKind::U32),
                ("unknown_a7", FieldKind::U32),
                ("unknown_a8", FieldKind::U32),
                ("unknown_a9", FieldKind::U32),
                ("dfp_bonus", FieldKind::U32),
            ],
            lines,
        ),
        DataKind::AttackData => dump_struct(
            "AttackData",
            bytes,
            &[
                ("unknown_a1", FieldKind::I16),
                ("atp", FieldKind::U16),
                ("ata_bonus", FieldKind::U16),
                ("unknown_a4", FieldKind::U16),
                ("distance_x", FieldKind::F32),
                ("angle_x", FieldKind::U32),
                ("distance_y", FieldKind::F32),
                ("angle_y", FieldKind::U32),
            ],
            lines,
        ),
        DataKind::MovementData => dump_struct(
            "MovementData",
            bytes,
            &[
                ("idle_move_speed", FieldKind::F32),
                ("idle_animation_speed", FieldKind::F32),
                ("move_speed", FieldKind::F32),
                ("animation_speed", FieldKind::F32),
                ("y_speed", FieldKind::F32),
                ("room_y_speed", FieldKind::F32),
            ],
            lines,
        ),
        DataKind::ImageData => dump_image(bytes, lines),
        DataKind::UnknownF8F2Data => dump_f8f2(bytes, lines),
        DataKind::None | DataKind::Script => {}
    }
}

fn dump_cstring(bytes: &[u8], encoding: TextEncoding, lines: &mut Vec<String>) {
    let text = match encoding {
        TextEncoding::Utf16Le => {
            let end = bytes
                .chunks_exact(2)
                .position(|c| c == [0, 0])
                .map(|p| p * 2)
                .unwrap_or(bytes.len());
            encoding.decode(&bytes[..end])
        }
        _ => {
            let end =
                bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
            encoding.decode(&bytes[..end])
        }
    };
    lines.push(format!("  // as string: {}", crate::encoding::escape(&text)));
}

enum FieldKind {
    U8,
    U16,
    I16,
    U32,
    F32,
    Bytes(usize),
}

impl FieldKind {
    fn size(&self) -> usize {
        match self {
            FieldKind::U8 => 1,
            FieldKind::U16 | FieldKind::I16 => 2,
            FieldKind::U32 | FieldKind::F32 => 4,
            FieldKind::Bytes(n) => *n,
        }
    }
}

fn dump_struct(
    name: &str,
    bytes: &[u8],
    fields: &[(&str, FieldKind)],
    lines: &mut Vec<String>,
) {
    let struct_size: usize = fields.iter().map(|(_, k)| k.size()).sum();
    lines.push(format!("  // as {name}:"));
    if bytes.len() < struct_size {
        lines.push(format!(
            "  //   ({} byte(s) is too short for {name}, {struct_size} needed)",
            bytes.len()
        ));
        return;
    }
    let mut r = Reader::new(bytes);
    for (field, kind) in fields {
        let offset = r.pos();
        // sizes were checked above, reads cannot fail
        let value = match kind {
            FieldKind::U8 => format!("0x{:02X}", r.read_u8().unwrap()),
            FieldKind::U16 => format!("0x{:04X}", r.read_u16().unwrap()),
            FieldKind::I16 => {
                format!("{}", r.read_u16().unwrap() as i16)
            }
            FieldKind::U32 => format!("0x{:08X}", r.read_u32().unwrap()),
            FieldKind::F32 => format!("{:?}", r.read_f32().unwrap()),
            FieldKind::Bytes(n) => crate::encoding::hex_string(
                r.read_bytes(*n).unwrap(),
            ),
        };
        lines.push(format!("  //   +{offset:04X}  {field:<20} {value}"));
    }
    if bytes.len() > struct_size {
        lines.push(format!(
            "  //   +{struct_size:04X}  ({} trailing byte(s))",
            bytes.len() - struct_size
        ));
    }
}

fn dump_image(bytes: &[u8], lines: &mut Vec<String>) {
    match prs::decompress(bytes, prs::DEFAULT_OUTPUT_LIMIT) {
        Ok(image) => {
            lines.push(format!(
                "  // as image data ({} byte(s) compressed, {} decompressed):",
                bytes.len(),
                image.len()
            ));
            for (i, chunk) in image.chunks(16).enumerate() {
                let pairs: Vec<String> =
                    chunk.iter().map(|b| format!("{b:02X}")).collect();
                lines.push(format!(
                    "  //   +{:04X}  {}",
                    i * 16,
                    pairs.join(" ")
                ));
            }
        }
        Err(err) => {
            lines.push(format!("  // as image data: decompression failed ({err:#})"));
        }
    }
}

fn dump_f8f2(bytes: &[u8], lines: &mut Vec<String>) {
    lines.push("  // as F8F2 records:".to_owned());
    let mut r = Reader::new(bytes);
    let mut index = 0usize;
    while r.remaining() >= 16 {
        let a = r.read_f32().unwrap();
        let b = r.read_f32().unwrap();
        let c = r.read_f32().unwrap();
        let d = r.read_f32().unwrap();
        lines.push(format!("  //   [{index}] {a:?}, {b:?}, {c:?}, {d:?}"));
        index += 1;
    }
    if r.remaining() > 0 {
        lines.push(format!(
            "  //   ({} trailing byte(s))",
            r.remaining()
        ));
    }
}
