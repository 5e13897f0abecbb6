use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use anyhow::Result;

use crate::encoding::{self, TextEncoding};
use crate::header::{self, HeaderKind, QuestMeta};
use crate::opcode::{self, flag, ArgDef, ArgKind, DataKind, OpDef};
use crate::reader::Reader;
use crate::{Build, DisassembleOptions};

pub mod data;

/// Accumulated semantic types of one label. A label can be reached as
/// code and as several kinds of data at once; one bit per kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct DataTypes(u16);

impl DataTypes {
    fn mask(kind: DataKind) -> u16 {
        match kind {
            DataKind::None => 0,
            DataKind::Script => 0x0001,
            DataKind::Data => 0x0002,
            DataKind::CString => 0x0004,
            DataKind::PlayerStats => 0x0008,
            DataKind::PlayerVisualConfig => 0x0010,
            DataKind::ResistData => 0x0020,
            DataKind::AttackData => 0x0040,
            DataKind::MovementData => 0x0080,
            DataKind::ImageData => 0x0100,
            DataKind::UnknownF8F2Data => 0x0200,
        }
    }

    pub(crate) fn set(&mut self, kind: DataKind) {
        self.0 |= Self::mask(kind);
    }

    pub(crate) fn contains(&self, kind: DataKind) -> bool {
        self.0 & Self::mask(kind) != 0
    }

    /// True when no data interpretation (script aside) was inferred.
    pub(crate) fn is_data_free(&self) -> bool {
        self.0 & !Self::mask(DataKind::Script) == 0
    }

    pub(crate) fn kinds(&self) -> impl Iterator<Item = DataKind> + '_ {
        [
            DataKind::Data,
            DataKind::CString,
            DataKind::PlayerStats,
            DataKind::PlayerVisualConfig,
            DataKind::ResistData,
            DataKind::AttackData,
            DataKind::MovementData,
            DataKind::ImageData,
            DataKind::UnknownF8F2Data,
        ]
        .into_iter()
        .filter(|k| self.contains(*k))
    }
}

#[derive(Clone, Debug)]
struct Label {
    index: u32,
    offset: u32,
    types: DataTypes,
    references: Vec<u32>,
}

/// One value of the simulated push-arg stack.
#[derive(Clone, Debug)]
enum StackValue {
    Reg(u8),
    RegPtr(u8),
    Label(u32),
    Int(u32),
    /// carried as the rendered source literal so a `bin:"..."` fallback
    /// survives the fold into its consumer
    CString(String),
}

#[derive(Clone, Debug)]
enum InsnBody {
    Op {
        def: &'static OpDef,
        args: Vec<String>,
        /// offsets of the push instructions folded into this line
        consumed: Vec<u32>,
        warning: Option<String>,
    },
    Unknown(u16),
    Failed(String),
}

#[derive(Clone, Debug)]
struct Insn {
    size: u32,
    raw: Vec<u8>,
    body: InsnBody,
}

/// Raw value of one directly-decoded argument, kept next to its rendering
/// so push primitives know what they push.
enum RawArg {
    Int(u32),
    Reg(u8),
    Label(u32),
    Str(String),
    Other,
}

pub fn disassemble(
    data: &[u8],
    build: Build,
    opts: &DisassembleOptions,
) -> Result<String> {
    build.require_active()?;
    let index = opcode::index_for(build)?;
    let meta = header::parse(data, build, opts.language_override)?;

    let code = &data[meta.code_offset as usize..meta.function_table_offset as usize];
    let table_len =
        (meta.size as usize - meta.function_table_offset as usize) / 4;
    let mut table = Reader::new(data)
        .sub(meta.function_table_offset as usize, table_len * 4)?;

    let mut d = Disassembler {
        build,
        opts,
        index,
        header_kind: build.header_kind()?,
        encoding: build.text_encoding(meta.language),
        code,
        labels: Vec::new(),
        by_index: HashMap::new(),
        by_offset: BTreeMap::new(),
        decoded: BTreeMap::new(),
        queue: VecDeque::new(),
    };

    for idx in 0..table_len as u32 {
        let offset = table.read_u32()?;
        // the sentinel and any out-of-range slot define no label; a slot
        // pointing at the very end of the code region is a valid (empty)
        // label, it just seeds no decode
        if (offset as usize) <= code.len() {
            d.add_label(idx, offset);
        }
    }
    if let Some(&pos) = d.by_index.get(&0) {
        d.labels[pos].types.set(DataKind::Script);
        d.queue.push_back(d.labels[pos].offset);
    }
    d.run();
    Ok(d.render(&meta))
}

pub(crate) fn read_opcode(r: &mut Reader) -> Result<u16> {
    // 0xF8/0xF9 select the two-byte page, big-endian on the wire
    match r.peek_u8() {
        Some(first) if first & 0xFE == 0xF8 => r.read_u16_be(),
        _ => Ok(r.read_u8()?.into()),
    }
}

struct Disassembler<'a> {
    build: Build,
    opts: &'a DisassembleOptions,
    index: &'static opcode::BuildIndex,
    header_kind: HeaderKind,
    encoding: TextEncoding,
    code: &'a [u8],
    labels: Vec<Label>,
    by_index: HashMap<u32, usize>,
    by_offset: BTreeMap<u32, Vec<usize>>,
    decoded: BTreeMap<u32, Insn>,
    queue: VecDeque<u32>,
}

impl<'a> Disassembler<'a> {
    fn add_label(&mut self, index: u32, offset: u32) {
        let pos = self.labels.len();
        self.labels.push(Label {
            index,
            offset,
            types: DataTypes::default(),
            references: Vec::new(),
        });
        self.by_index.insert(index, pos);
        self.by_offset.entry(offset).or_default().push(pos);
    }

    fn label_name(index: u32) -> String {
        if index == 0 {
            "start".to_owned()
        } else {
            format!("label{index:04X}")
        }
    }

    /// Register a reference to label `id`, fold in the argument's data
    /// type, and enqueue SCRIPT targets. Returns the rendered name.
    fn touch_label(
        &mut self,
        id: u32,
        data_type: DataKind,
        from: u32,
    ) -> String {
        match self.by_index.get(&id).copied() {
            Some(pos) => {
                self.labels[pos].references.push(from);
                if data_type != DataKind::None {
                    self.labels[pos].types.set(data_type);
                }
                if data_type == DataKind::Script {
                    self.queue.push_back(self.labels[pos].offset);
                }
            }
            None => {
                tracing::warn!(
                    id,
                    from,
                    "label reference leaves the function table"
                );
            }
        }
        Self::label_name(id)
    }

    /// Reachability walk: drain the queue, then decode the remaining
    /// flag-free function-table entries as code, in index order.
    fn run(&mut self) {
        let mut attempted: HashSet<u32> = HashSet::new();
        loop {
            while let Some(offset) = self.queue.pop_front() {
                self.decode_chain(offset);
            }
            let indices: Vec<u32> = {
                let mut v: Vec<u32> = self.by_index.keys().copied().collect();
                v.sort_unstable();
                v
            };
            let next = indices.into_iter().find(|idx| {
                if attempted.contains(idx) {
                    return false;
                }
                let label = &self.labels[self.by_index[idx]];
                label.types.is_data_free()
                    && !self.decoded.contains_key(&label.offset)
            });
            match next {
                Some(idx) => {
                    attempted.insert(idx);
                    let offset = self.labels[self.by_index[&idx]].offset;
                    self.queue.push_back(offset);
                }
                None => break,
            }
        }
    }

    fn decode_chain(&mut self, start: u32) {
        let mut stack: Vec<(u32, StackValue)> = Vec::new();
        let mut offset = start;
        while (offset as usize) < self.code.len() {
            if self.decoded.contains_key(&offset) {
                break;
            }
            let insn = self.decode_one(offset, &mut stack);
            let size = insn.size;
            let stop = match &insn.body {
                InsnBody::Unknown(_) | InsnBody::Failed(_) => true,
                InsnBody::Op { def, .. } => def.is(flag::F_RET),
            };
            self.decoded.insert(offset, insn);
            if stop {
                break;
            }
            offset += size;
        }
    }

    /// Decode the instruction at `offset`. Decode failures become a
    /// `.failed` line; they never abort the whole walk.
    fn decode_one(
        &mut self,
        offset: u32,
        stack: &mut Vec<(u32, StackValue)>,
    ) -> Insn {
        let mut r = Reader::new(self.code);
        if r.seek(offset as usize).is_err() {
            return Insn {
                size: 0,
                raw: Vec::new(),
                body: InsnBody::Failed("offset out of range".to_owned()),
            };
        }
        match self.decode_inner(&mut r, offset, stack) {
            Ok(body) => {
                let size = (r.pos() - offset as usize) as u32;
                Insn {
                    size,
                    raw: self.code[offset as usize..r.pos()].to_vec(),
                    body,
                }
            }
            Err(err) => Insn {
                size: 0,
                raw: Vec::new(),
                body: InsnBody::Failed(format!("{err:#}")),
            },
        }
    }

    fn decode_inner(
        &mut self,
        r: &mut Reader,
        offset: u32,
        stack: &mut Vec<(u32, StackValue)>,
    ) -> Result<InsnBody> {
        let op = read_opcode(r)?;
        let Some(def) = self.index.by_opcode(op) else {
            return Ok(InsnBody::Unknown(op));
        };

        let from_stack = def.is(flag::F_ARGS) && self.build.has_args();
        let mut args = Vec::new();
        let mut raws = Vec::new();
        let mut consumed = Vec::new();
        let mut warning = None;
        if from_stack {
            if stack.len() == def.args.len() {
                for (arg, (push_offset, value)) in
                    def.args.iter().zip(stack.iter())
                {
                    args.push(self.render_stack_value(arg, value, offset));
                    consumed.push(*push_offset);
                }
            } else {
                warning = Some(format!(
                    "arg stack holds {} value(s), opcode takes {}",
                    stack.len(),
                    def.args.len()
                ));
            }
        } else {
            for arg in def.args {
                let (text, raw) = self.decode_arg(r, arg, offset)?;
                args.push(text);
                raws.push(raw);
            }
        }

        if def.is(flag::F_PASS) {
            let value = match raws.first() {
                Some(RawArg::Reg(n)) if def.opcode == 0x004C => {
                    StackValue::RegPtr(*n)
                }
                Some(RawArg::Reg(n)) => StackValue::Reg(*n),
                Some(RawArg::Label(id)) => StackValue::Label(*id),
                Some(RawArg::Int(v)) => StackValue::Int(*v),
                Some(RawArg::Str(s)) => StackValue::CString(s.clone()),
                _ => StackValue::Int(0),
            };
            stack.push((offset, value));
        } else {
            // anything that is not a push clears the stack, consumer or not
            stack.clear();
        }

        Ok(InsnBody::Op {
            def,
            args,
            consumed,
            warning,
        })
    }

    fn decode_arg(
        &mut self,
        r: &mut Reader,
        arg: &ArgDef,
        insn_offset: u32,
    ) -> Result<(String, RawArg)> {
        Ok(match arg.kind {
            ArgKind::Label16 => {
                let id = u32::from(r.read_u16()?);
                let name = self.touch_label(id, arg.data_type, insn_offset);
                (name, RawArg::Label(id))
            }
            ArgKind::Label32 => {
                let id = r.read_u32()?;
                let name = self.touch_label(id, arg.data_type, insn_offset);
                (name, RawArg::Label(id))
            }
            ArgKind::Label16Set => {
                let count = r.read_u8()?;
                let mut names = Vec::with_capacity(count.into());
                for _ in 0..count {
                    let id = u32::from(r.read_u16()?);
                    names.push(self.touch_label(
                        id,
                        arg.data_type,
                        insn_offset,
                    ));
                }
                (format!("[{}]", names.join(", ")), RawArg::Other)
            }
            ArgKind::Reg => {
                let n = r.read_u8()?;
                (format!("r{n}"), RawArg::Reg(n))
            }
            ArgKind::RegSet => {
                let count = r.read_u8()?;
                let mut regs = Vec::with_capacity(count.into());
                for _ in 0..count {
                    regs.push(format!("r{}", r.read_u8()?));
                }
                (format!("[{}]", regs.join(", ")), RawArg::Other)
            }
            ArgKind::RegSetFixed => {
                let n = r.read_u8()?;
                (render_reg_range(n, arg.count), RawArg::Reg(n))
            }
            ArgKind::Reg32 => {
                let n = r.read_u32()?;
                (format!("r{}", n & 0xFF), RawArg::Reg(n as u8))
            }
            ArgKind::Reg32SetFixed => {
                let n = r.read_u32()?;
                (render_reg_range(n as u8, arg.count), RawArg::Reg(n as u8))
            }
            ArgKind::Int8 => {
                let v = u32::from(r.read_u8()?);
                (format!("0x{v:X}"), RawArg::Int(v))
            }
            ArgKind::Int16 => {
                let v = u32::from(r.read_u16()?);
                (format!("0x{v:X}"), RawArg::Int(v))
            }
            ArgKind::Int32 => {
                let v = r.read_u32()?;
                (format!("0x{v:X}"), RawArg::Int(v))
            }
            ArgKind::Float32 => {
                let v = r.read_f32()?;
                (format!("{v:?}"), RawArg::Int(v.to_bits()))
            }
            ArgKind::CString => {
                let literal = self.decode_cstring(r)?;
                (literal.clone(), RawArg::Str(literal))
            }
        })
    }

    /// Decode a wire C-string and render a source literal for it. Strings
    /// whose decode does not survive a re-encode render as `bin:"..."` so
    /// the listing stays byte-faithful.
    fn decode_cstring(&self, r: &mut Reader) -> Result<String> {
        let raw: Vec<u8> = if self.encoding == TextEncoding::Utf16Le {
            let units = r.read_cstr_utf16_units()?;
            units.iter().flat_map(|u| u.to_le_bytes()).collect()
        } else {
            r.read_cstr_bytes()?.to_vec()
        };
        let text = self.encoding.decode(&raw);
        if self.encoding.encode(&text) == raw {
            Ok(encoding::escape(&text))
        } else {
            Ok(format!("bin:\"{}\"", encoding::hex_string(&raw)))
        }
    }

    fn render_stack_value(
        &mut self,
        arg: &ArgDef,
        value: &StackValue,
        consumer_offset: u32,
    ) -> String {
        match value {
            StackValue::Reg(n) => format!("r{n}"),
            StackValue::RegPtr(n) => format!("@r{n}"),
            StackValue::CString(literal) => literal.clone(),
            StackValue::Label(id) => {
                let name =
                    self.touch_label(*id, arg.data_type, consumer_offset);
                format!("@{name}")
            }
            StackValue::Int(v) => match arg.kind {
                ArgKind::Label16 | ArgKind::Label32 | ArgKind::Label16Set => {
                    self.touch_label(*v, arg.data_type, consumer_offset)
                }
                ArgKind::Reg | ArgKind::Reg32 => format!("r{}", v & 0xFF),
                ArgKind::RegSetFixed | ArgKind::Reg32SetFixed => {
                    render_reg_range(*v as u8, arg.count)
                }
                ArgKind::Float32 => format!("{:?}", f32::from_bits(*v)),
                _ => format!("0x{v:X}"),
            },
        }
    }

    // rendering -----------------------------------------------------------

    fn render(&self, meta: &QuestMeta) -> String {
        let mut lines = Vec::new();
        self.render_meta(meta, &mut lines);
        lines.push(String::new());

        // pushes folded into a consumer disappear from round-trippable
        // output; annotated mode shows them in place
        let suppressed: HashSet<u32> = if self.opts.annotated {
            HashSet::new()
        } else {
            self.decoded
                .values()
                .filter_map(|insn| match &insn.body {
                    InsnBody::Op { consumed, .. } => Some(consumed),
                    _ => None,
                })
                .flatten()
                .copied()
                .collect()
        };

        let label_offsets: Vec<u32> = self.by_offset.keys().copied().collect();
        let mut next_label = 0usize;
        let mut offset = 0u32;
        while (offset as usize) < self.code.len() {
            while next_label < label_offsets.len()
                && label_offsets[next_label] <= offset
            {
                self.render_label_block(label_offsets[next_label], &mut lines);
                next_label += 1;
            }
            match self.decoded.get(&offset) {
                Some(insn) => match &insn.body {
                    InsnBody::Failed(message) => {
                        lines.push(format!("  .failed ({message})"));
                        let end = self.region_end(offset, &label_offsets);
                        self.render_data_region(offset, end, &mut lines);
                        offset = end;
                    }
                    InsnBody::Unknown(op) => {
                        self.push_insn_line(
                            offset,
                            insn,
                            format!(".unknown {op:04X}"),
                            &mut lines,
                        );
                        offset += insn.size;
                    }
                    InsnBody::Op {
                        def,
                        args,
                        warning,
                        ..
                    } => {
                        if !suppressed.contains(&offset) {
                            let mut body = def
                                .display_name(self.opts.qedit_names)
                                .to_owned();
                            if !args.is_empty() {
                                body = format!("{body:<24}{}", args.join(", "));
                            }
                            if let Some(warning) = warning {
                                body = format!("{body}  /* {warning} */");
                            }
                            self.push_insn_line(offset, insn, body, &mut lines);
                        }
                        offset += insn.size;
                    }
                },
                None => {
                    let end = self.region_end(offset, &label_offsets);
                    self.render_data_region(offset, end, &mut lines);
                    offset = end;
                }
            }
        }
        // labels pointing exactly at the end of the code region
        while next_label < label_offsets.len() {
            self.render_label_block(label_offsets[next_label], &mut lines);
            next_label += 1;
        }
        lines.push(String::new());
        lines.join("\n")
    }

    fn render_meta(&self, meta: &QuestMeta, lines: &mut Vec<String>) {
        let kind = self.header_kind;
        lines.push(format!(".version {}", self.build.name()));
        lines.push(format!(".name {}", encoding::escape(&meta.name)));
        lines.push(format!(".quest_num {}", meta.quest_number));
        lines.push(format!(".language {}", meta.language));
        if matches!(kind, HeaderKind::Gc | HeaderKind::Bb) {
            lines.push(format!(".episode {}", u8::from(meta.episode)));
        }
        if kind == HeaderKind::Bb {
            lines.push(format!(".max_players {}", meta.max_players));
            if meta.joinable {
                lines.push(".joinable".to_owned());
            }
        }
        if kind != HeaderKind::Nte {
            lines.push(format!(
                ".short_desc {}",
                encoding::escape(&meta.short_description)
            ));
            lines.push(format!(
                ".long_desc {}",
                encoding::escape(&meta.long_description)
            ));
        }
    }

    fn push_insn_line(
        &self,
        offset: u32,
        insn: &Insn,
        body: String,
        lines: &mut Vec<String>,
    ) {
        if self.opts.annotated {
            lines.push(format!(
                "  {offset:08X}  {}  {body}",
                hex_column(&insn.raw)
            ));
        } else {
            lines.push(format!("  {body}"));
        }
    }

    /// First boundary after `offset`: the next label, decoded instruction
    /// or the end of the code region.
    fn region_end(&self, offset: u32, label_offsets: &[u32]) -> u32 {
        let mut end = self.code.len() as u32;
        if let Some(next) = label_offsets.iter().find(|o| **o > offset) {
            end = end.min(*next);
        }
        if let Some((next, _)) = self.decoded.range(offset + 1..).next() {
            end = end.min(*next);
        }
        end
    }

    /// Label definition line(s) at `offset`, and in annotated mode one
    /// structured dump per set data-type flag. A label can carry data
    /// flags while its bytes also decode as code; the dumps render either
    /// way, over the bytes up to the next label.
    fn render_label_block(&self, offset: u32, lines: &mut Vec<String>) {
        let mut types = DataTypes::default();
        for &pos in &self.by_offset[&offset] {
            let label = &self.labels[pos];
            let mut line = if label.index == 0 {
                "start:".to_owned()
            } else {
                format!("{}@{}:", Self::label_name(label.index), label.index)
            };
            if self.opts.annotated && !label.references.is_empty() {
                let mut refs: Vec<u32> = label.references.clone();
                refs.sort_unstable();
                refs.dedup();
                let list: Vec<String> =
                    refs.iter().map(|r| format!("0x{r:08X}")).collect();
                line = format!("{line}  // Referenced by: {}", list.join(", "));
            }
            lines.push(line);
            for kind in label.types.kinds() {
                types.set(kind);
            }
        }
        if self.opts.annotated {
            let end = self.label_data_extent(offset);
            if end > offset {
                let bytes = &self.code[offset as usize..end as usize];
                for kind in types.kinds() {
                    data::render_dump(kind, bytes, self.encoding, lines);
                }
            }
        }
    }

    /// The bytes a label's data interpretations cover: up to the next
    /// label or the end of the code region.
    fn label_data_extent(&self, offset: u32) -> u32 {
        self.by_offset
            .range(offset + 1..)
            .next()
            .map(|(next, _)| *next)
            .unwrap_or(self.code.len() as u32)
    }

    fn render_data_region(
        &self,
        start: u32,
        end: u32,
        lines: &mut Vec<String>,
    ) {
        if start >= end {
            return;
        }
        let bytes = &self.code[start as usize..end as usize];
        for (i, chunk) in bytes.chunks(16).enumerate() {
            let pairs: Vec<String> =
                chunk.iter().map(|b| format!("{b:02X}")).collect();
            let body = format!(".data {}", pairs.join(" "));
            if self.opts.annotated {
                let offset = start + (i * 16) as u32;
                lines.push(format!(
                    "  {offset:08X}  {}  {body}",
                    hex_column(chunk)
                ));
            } else {
                lines.push(format!("  {body}"));
            }
        }
    }
}

/// `rN-rM` range form, or the explicit tuple form when the chain wraps
/// past r255.
fn render_reg_range(first: u8, count: u8) -> String {
    if count <= 1 {
        return format!("r{first}");
    }
    let last = u16::from(first) + u16::from(count) - 1;
    if last <= 0xFF {
        format!("r{first}-r{last}")
    } else {
        let regs: Vec<String> = (0..count)
            .map(|i| format!("r{}", first.wrapping_add(i)))
            .collect();
        format!("({})", regs.join(", "))
    }
}

const HEX_COLUMN_WIDTH: usize = 23;

fn hex_column(raw: &[u8]) -> String {
    let width = HEX_COLUMN_WIDTH;
    let mut text = raw
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ");
    if text.len() > width {
        text.truncate(width - 3);
        text.push_str("...");
    }
    format!("{text:<width$}")
}
