use std::collections::HashMap;

use anyhow::{anyhow, ensure, Context, Result};

use crate::encoding::{self, TextEncoding};
use crate::error::QuestScriptError;
use crate::header::{self, QuestMeta};
use crate::native::CpuFamily;
use crate::opcode::{self, flag, ArgDef, ArgKind, BuildIndex, OpDef};
use crate::reader::BytesExt;
use crate::{AssembleOptions, AssembledQuest, Build, Episode};

pub(crate) mod register;

use register::{RegRef, RegisterBank};

const ARG_PUSHR: u8 = 0x48;
const ARG_PUSHL: u8 = 0x49;
const ARG_PUSHW: u8 = 0x4A;
const ARG_PUSHB: u8 = 0x4B;
const ARG_PUSHA: u8 = 0x4C;
const ARG_PUSHO: u8 = 0x4D;
const ARG_PUSHS: u8 = 0x4E;

pub fn assemble(text: &str, opts: &AssembleOptions) -> Result<AssembledQuest> {
    let stripped = strip_comments(text)?;
    let lines: Vec<(usize, &str)> = stripped
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    let directives = collect_directives(&lines)?;
    let build = match (opts.build_override, directives.version) {
        (Some(build), _) => build,
        (None, Some(build)) => build,
        (None, None) => {
            return Err(QuestScriptError::UnknownBuild(
                "(missing .version)".to_owned(),
            )
            .into())
        }
    };
    build.require_active()?;
    ensure!(
        directives.quest_num.is_some(),
        QuestScriptError::MissingDirective(".quest_num")
    );
    ensure!(
        directives.name.is_some(),
        QuestScriptError::MissingDirective(".name")
    );

    let labels = collect_labels(&lines)?;
    let language = directives.language.unwrap_or(1);
    let mut asm = Assembler {
        build,
        encoding: build.text_encoding(language),
        index: opcode::index_for(build)?,
        labels,
        label_offsets: HashMap::new(),
        code: Vec::new(),
        bank: RegisterBank::default(),
        opts,
    };

    for (number, line) in &lines {
        asm.emit_line(line)
            .with_context(|| format!("(line {number})"))?;
    }
    while asm.code.len() % 4 != 0 {
        asm.code.push(0);
    }
    let mut code = std::mem::take(&mut asm.code);
    asm.bank.assign_all(&mut code)?;

    // function table: one u32 per index up to the highest defined label,
    // the sentinel filling the gaps
    let max_index = asm.labels.values().copied().max().unwrap_or(0);
    let mut table = Vec::with_capacity((max_index as usize + 1) * 4);
    for index in 0..=max_index {
        match asm.label_offsets.get(&index) {
            Some(offset) => table.put_u32l(*offset),
            None => table.put_u32l(0xFFFF_FFFF),
        }
    }

    let header_size = build.header_kind()?.size() as u32;
    let meta = QuestMeta {
        code_offset: header_size,
        function_table_offset: header_size + code.len() as u32,
        size: header_size + code.len() as u32 + table.len() as u32,
        is_download: false,
        language,
        quest_number: directives.quest_num.unwrap_or(0),
        episode: directives.episode.unwrap_or(Episode::Episode1),
        name: directives.name.unwrap_or_default(),
        short_description: directives.short_desc.unwrap_or_default(),
        long_description: directives.long_desc.unwrap_or_default(),
        max_players: directives.max_players.unwrap_or(4),
        joinable: directives.joinable,
    };
    let mut data = header::emit(&meta, build)?;
    data.extend_from_slice(&code);
    data.extend_from_slice(&table);
    Ok(AssembledQuest { build, data })
}

/// Remove `/* ... */` and `// ...` comments, leaving string literals and
/// line numbering intact.
fn strip_comments(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;
    let mut in_block = false;
    while let Some(c) = chars.next() {
        if in_block {
            if c == '*' && chars.peek() == Some(&'/') {
                chars.next();
                in_block = false;
            } else if c == '\n' {
                out.push('\n');
            }
            continue;
        }
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                in_block = true;
            }
            '/' if chars.peek() == Some(&'/') => {
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            c => out.push(c),
        }
    }
    ensure!(!in_block, QuestScriptError::UnterminatedComment);
    Ok(out)
}

#[derive(Debug, Default)]
struct Directives {
    version: Option<Build>,
    name: Option<String>,
    short_desc: Option<String>,
    long_desc: Option<String>,
    quest_num: Option<u16>,
    language: Option<u8>,
    episode: Option<Episode>,
    max_players: Option<u8>,
    joinable: bool,
}

fn collect_directives(lines: &[(usize, &str)]) -> Result<Directives> {
    let mut d = Directives::default();
    for (number, line) in lines {
        let Some(rest) = line.strip_prefix('.') else {
            continue;
        };
        let (word, value) = match rest.split_once(char::is_whitespace) {
            Some((word, value)) => (word, value.trim()),
            None => (rest, ""),
        };
        (|| -> Result<()> {
            match word {
                "version" => d.version = Some(Build::from_name(value)?),
                "name" => d.name = Some(parse_quoted(value)?),
                "short_desc" => d.short_desc = Some(parse_quoted(value)?),
                "long_desc" => d.long_desc = Some(parse_quoted(value)?),
                "quest_num" => {
                    d.quest_num = Some(parse_int(value)?.try_into()?)
                }
                "language" => {
                    d.language = Some(parse_int(value)?.try_into()?)
                }
                "episode" => {
                    d.episode = Some(Episode::from_header_byte(
                        parse_int(value)?.try_into()?,
                    )?)
                }
                "max_players" => {
                    d.max_players = Some(parse_int(value)?.try_into()?)
                }
                "joinable" => d.joinable = true,
                // code-section directives are handled by the emitter
                _ => {}
            }
            Ok(())
        })()
        .with_context(|| format!("(line {number})"))?;
    }
    Ok(d)
}

/// `name:` or `name@N:` on a line of its own.
fn parse_label_line(line: &str) -> Option<(&str, Option<u32>)> {
    let body = line.strip_suffix(':')?;
    let (name, pin) = match body.split_once('@') {
        Some((name, pin)) => (name, Some(pin.parse::<u32>().ok()?)),
        None => (body, None),
    };
    is_ident(name).then_some((name, pin))
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Collect every label and give each its function-table index: pins win,
/// `start` is index 0, the rest take the lowest unused index in ascending
/// name order.
fn collect_labels(lines: &[(usize, &str)]) -> Result<HashMap<String, u32>> {
    let mut pinned: Vec<(String, u32)> = Vec::new();
    let mut unpinned: Vec<String> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    for (number, line) in lines {
        let Some((name, pin)) = parse_label_line(line) else {
            continue;
        };
        if seen.insert(name.to_owned(), *number).is_some() {
            return Err(QuestScriptError::DuplicateLabel(name.to_owned()))
                .with_context(|| format!("(line {number})"));
        }
        let pin = match (name, pin) {
            ("start", None) => Some(0),
            ("start", Some(0)) => Some(0),
            ("start", Some(other)) => {
                return Err(anyhow!(
                    "label start must have index 0, not {other} (line {number})"
                ))
            }
            (_, pin) => pin,
        };
        match pin {
            Some(pin) => pinned.push((name.to_owned(), pin)),
            None => unpinned.push(name.to_owned()),
        }
    }
    ensure!(
        seen.contains_key("start"),
        QuestScriptError::UndefinedLabel("start".to_owned())
    );

    let mut by_index: HashMap<u32, String> = HashMap::new();
    let mut labels = HashMap::new();
    for (name, index) in pinned {
        if let Some(other) = by_index.insert(index, name.clone()) {
            return Err(QuestScriptError::DuplicateIndex {
                label: format!("{other} and {name}"),
                index,
            }
            .into());
        }
        labels.insert(name, index);
    }
    unpinned.sort_unstable();
    let mut next = 0u32;
    for name in unpinned {
        while by_index.contains_key(&next) {
            next += 1;
        }
        by_index.insert(next, name.clone());
        labels.insert(name, next);
        next += 1;
    }
    Ok(labels)
}

struct Assembler<'a> {
    build: Build,
    encoding: TextEncoding,
    index: &'static BuildIndex,
    labels: HashMap<String, u32>,
    /// index -> code offset, recorded when the definition line is reached
    label_offsets: HashMap<u32, u32>,
    code: Vec<u8>,
    bank: RegisterBank,
    opts: &'a AssembleOptions,
}

impl Assembler<'_> {
    fn emit_line(&mut self, line: &str) -> Result<()> {
        if let Some((name, _)) = parse_label_line(line) {
            let index = self.labels[name];
            self.label_offsets.insert(index, self.code.len() as u32);
            return Ok(());
        }
        if let Some(rest) = line.strip_prefix('.') {
            let (word, value) = match rest.split_once(char::is_whitespace) {
                Some((word, value)) => (word, value.trim()),
                None => (rest, ""),
            };
            return self.emit_directive(word, value);
        }
        let (mnemonic, rest) = match line.split_once(char::is_whitespace) {
            Some((mnemonic, rest)) => (mnemonic, rest.trim()),
            None => (line, ""),
        };
        let def = self.index.by_name(mnemonic).ok_or_else(|| {
            QuestScriptError::UnknownMnemonic(mnemonic.to_owned())
        })?;
        let tokens = parse_tokens(rest)?;
        ensure!(
            tokens.len() == def.args.len(),
            QuestScriptError::ArgCountMismatch {
                mnemonic: mnemonic.to_owned(),
                expected: def.args.len(),
                got: tokens.len(),
            }
        );
        if self.build.has_args() && def.is(flag::F_ARGS) {
            self.encode_push_args(def, &tokens)?;
            self.emit_opcode(def);
        } else {
            self.emit_opcode(def);
            for (k, (arg, token)) in
                def.args.iter().zip(tokens.iter()).enumerate()
            {
                self.encode_direct(arg, token)
                    .with_context(|| format!("(arg {})", k + 1))?;
            }
        }
        Ok(())
    }

    fn emit_directive(&mut self, word: &str, value: &str) -> Result<()> {
        match word {
            // metadata, collected in the first pass
            "version" | "name" | "short_desc" | "long_desc" | "quest_num"
            | "language" | "episode" | "max_players" | "joinable" => Ok(()),
            "data" => {
                for group in value.split_whitespace() {
                    ensure!(
                        group.len() % 2 == 0,
                        "odd number of hex digits in .data"
                    );
                    for i in (0..group.len()).step_by(2) {
                        let byte = u8::from_str_radix(&group[i..i + 2], 16)
                            .map_err(|_| anyhow!("invalid hex in .data"))?;
                        self.code.push(byte);
                    }
                }
                Ok(())
            }
            "zero" => {
                let count = usize::try_from(parse_int(value)?)?;
                self.code.resize(self.code.len() + count, 0);
                Ok(())
            }
            "zero_until" => {
                let target = usize::try_from(parse_int(value)?)?;
                ensure!(
                    target >= self.code.len(),
                    ".zero_until {target:#X} is behind the current offset \
                     {:#X}",
                    self.code.len()
                );
                self.code.resize(target, 0);
                Ok(())
            }
            "align" => {
                let alignment = usize::try_from(parse_int(value)?)?;
                ensure!(
                    alignment.is_power_of_two(),
                    ".align needs a power of two"
                );
                while self.code.len() % alignment != 0 {
                    self.code.push(0);
                }
                Ok(())
            }
            "include_bin" => {
                let bytes = std::fs::read(self.include_path(value)?)?;
                self.code.extend_from_slice(&bytes);
                Ok(())
            }
            "include_native" => {
                let text =
                    std::fs::read_to_string(self.include_path(value)?)?;
                let family = CpuFamily::for_build(self.build);
                let bytes = self.opts.native.assemble(family, &text)?;
                self.code.extend_from_slice(&bytes);
                Ok(())
            }
            other => Err(anyhow!("unknown directive .{other}")),
        }
    }

    fn include_path(&self, name: &str) -> Result<std::path::PathBuf> {
        let dir = self.opts.include_dir.as_ref().ok_or_else(|| {
            anyhow!("no include directory configured for .include_*")
        })?;
        let relative = std::path::Path::new(name);
        ensure!(
            relative.is_relative()
                && !relative
                    .components()
                    .any(|c| c == std::path::Component::ParentDir),
            "include path may not leave the include directory"
        );
        Ok(dir.join(relative))
    }

    fn emit_opcode(&mut self, def: &OpDef) {
        if def.wire_size() == 2 {
            self.code.put_u16b(def.opcode);
        } else {
            self.code.put_u8(def.opcode as u8);
        }
    }

    fn label_index(&self, name: &str) -> Result<u32> {
        self.labels.get(name).copied().ok_or_else(|| {
            QuestScriptError::UndefinedLabel(name.to_owned()).into()
        })
    }

    fn reg_ref(&mut self, token: &RegToken) -> Result<RegRef> {
        match token {
            RegToken::Numeric(n) => Ok(self.bank.numeric(*n)),
            RegToken::Named(name, pin) => self.bank.named(name, *pin),
        }
    }

    fn emit_reg(&mut self, r: RegRef) {
        let offset = self.code.len();
        self.code.put_u8(self.bank.number_of(r).unwrap_or(0));
        self.bank.record_patch(r, offset);
    }

    fn emit_reg32(&mut self, r: RegRef) {
        let offset = self.code.len();
        self.code.put_u32l(self.bank.number_of(r).unwrap_or(0).into());
        // little-endian, so the low byte sits at the word offset
        self.bank.record_patch(r, offset);
    }

    /// Fixed consecutive set: explicit tuple, range, or a single first
    /// register with anonymous successors. Returns the first register.
    fn fixed_set(&mut self, token: &Token, count: u8) -> Result<RegRef> {
        let refs: Vec<RegRef> = match token {
            Token::Reg(t) => {
                let first = self.reg_ref(t)?;
                let mut prev = first;
                for _ in 1..count {
                    let member = self.bank.anonymous();
                    self.bank.constrain(prev, member)?;
                    prev = member;
                }
                return Ok(first);
            }
            Token::Tuple(elements) | Token::List(elements) => elements
                .iter()
                .map(|e| {
                    let t = parse_reg_element(e)?;
                    self.reg_ref(&t)
                })
                .collect::<Result<_>>()?,
            Token::RegRange(tokens) => tokens
                .iter()
                .map(|t| self.reg_ref(t))
                .collect::<Result<_>>()?,
            other => {
                return Err(mismatch(
                    "consecutive registers (rA, rB, ...)",
                    other,
                ))
            }
        };
        ensure!(
            refs.len() == usize::from(count),
            QuestScriptError::ArgCountMismatch {
                mnemonic: "register set".to_owned(),
                expected: count.into(),
                got: refs.len(),
            }
        );
        for pair in refs.windows(2) {
            self.bank.constrain(pair[0], pair[1])?;
        }
        Ok(refs[0])
    }

    fn encode_direct(&mut self, arg: &ArgDef, token: &Token) -> Result<()> {
        match arg.kind {
            ArgKind::Label16 => match token {
                Token::Ident(name) => {
                    let index = self.label_index(name)?;
                    ensure!(index <= 0xFFFF, "label index out of range");
                    self.code.put_u16l(index as u16);
                    Ok(())
                }
                other => Err(mismatch("a label", other)),
            },
            ArgKind::Label32 => match token {
                Token::Ident(name) => {
                    let index = self.label_index(name)?;
                    self.code.put_u32l(index);
                    Ok(())
                }
                other => Err(mismatch("a label", other)),
            },
            ArgKind::Label16Set => match token {
                Token::List(elements) => {
                    ensure!(elements.len() <= 0xFF, "label set too long");
                    self.code.put_u8(elements.len() as u8);
                    for element in elements {
                        ensure!(
                            is_ident(element),
                            QuestScriptError::ArgTypeMismatch {
                                expected: "a label",
                                got: element.clone(),
                            }
                        );
                        let index = self.label_index(element)?;
                        ensure!(index <= 0xFFFF, "label index out of range");
                        self.code.put_u16l(index as u16);
                    }
                    Ok(())
                }
                other => Err(mismatch("a label set [a, b, ...]", other)),
            },
            ArgKind::Reg => match token {
                Token::Reg(t) => {
                    let r = self.reg_ref(t)?;
                    self.emit_reg(r);
                    Ok(())
                }
                other => Err(mismatch("a register", other)),
            },
            ArgKind::Reg32 => match token {
                Token::Reg(t) => {
                    let r = self.reg_ref(t)?;
                    self.emit_reg32(r);
                    Ok(())
                }
                other => Err(mismatch("a register", other)),
            },
            ArgKind::RegSet => match token {
                Token::List(elements) => {
                    ensure!(elements.len() <= 0xFF, "register set too long");
                    self.code.put_u8(elements.len() as u8);
                    for element in elements {
                        let t = parse_reg_element(element)?;
                        let r = self.reg_ref(&t)?;
                        self.emit_reg(r);
                    }
                    Ok(())
                }
                other => Err(mismatch("a register set [rA, rB, ...]", other)),
            },
            ArgKind::RegSetFixed => {
                let first = self.fixed_set(token, arg.count)?;
                self.emit_reg(first);
                Ok(())
            }
            ArgKind::Reg32SetFixed => {
                let first = self.fixed_set(token, arg.count)?;
                self.emit_reg32(first);
                Ok(())
            }
            ArgKind::Int8 => {
                let v = int_value(token)?;
                self.code.put_u8(v as u8);
                Ok(())
            }
            ArgKind::Int16 => {
                let v = int_value(token)?;
                self.code.put_u16l(v as u16);
                Ok(())
            }
            ArgKind::Int32 => {
                let v = int_value(token)?;
                self.code.put_u32l(v as u32);
                Ok(())
            }
            ArgKind::Float32 => {
                let v = match token {
                    Token::Float(f) => *f,
                    Token::Int(v) => *v as f32,
                    other => return Err(mismatch("a float", other)),
                };
                self.code.put_f32l(v);
                Ok(())
            }
            ArgKind::CString => {
                let bytes = self.string_bytes(token)?;
                self.code.extend_from_slice(&bytes);
                Ok(())
            }
        }
    }

    /// NUL-terminated wire form of a string or `bin:` token.
    fn string_bytes(&self, token: &Token) -> Result<Vec<u8>> {
        let mut bytes = match token {
            Token::Str(text) => self.encoding.encode(text),
            Token::Bin(raw) => raw.clone(),
            other => return Err(mismatch("a string", other)),
        };
        bytes.extend_from_slice(self.encoding.terminator());
        Ok(bytes)
    }

    /// The V3 calling convention: one push primitive per argument, then
    /// the consuming opcode (emitted by the caller).
    fn encode_push_args(
        &mut self,
        def: &OpDef,
        tokens: &[Token],
    ) -> Result<()> {
        for (k, (arg, token)) in
            def.args.iter().zip(tokens.iter()).enumerate()
        {
            self.encode_one_push(arg, token)
                .with_context(|| format!("(arg {})", k + 1))?;
        }
        Ok(())
    }

    fn encode_one_push(&mut self, arg: &ArgDef, token: &Token) -> Result<()> {
        match token {
            Token::Ident(name) if arg.is_label() => {
                let index = self.label_index(name)?;
                ensure!(index <= 0xFFFF, "label index out of range");
                self.code.put_u8(ARG_PUSHW);
                self.code.put_u16l(index as u16);
            }
            Token::AtIdent(name) => {
                let index = self.label_index(name)?;
                ensure!(index <= 0xFFFF, "label index out of range");
                self.code.put_u8(ARG_PUSHO);
                self.code.put_u16l(index as u16);
            }
            Token::AtReg(t) => {
                self.code.put_u8(ARG_PUSHA);
                let r = self.reg_ref(t)?;
                self.emit_reg(r);
            }
            Token::Reg(t) => {
                let out_param = matches!(
                    arg.kind,
                    ArgKind::Reg
                        | ArgKind::Reg32
                        | ArgKind::RegSetFixed
                        | ArgKind::Reg32SetFixed
                );
                self.code
                    .put_u8(if out_param { ARG_PUSHB } else { ARG_PUSHR });
                if matches!(
                    arg.kind,
                    ArgKind::RegSetFixed | ArgKind::Reg32SetFixed
                ) {
                    let first = self.fixed_set(token, arg.count)?;
                    self.emit_reg(first);
                } else {
                    let r = self.reg_ref(t)?;
                    self.emit_reg(r);
                }
            }
            Token::Tuple(_) | Token::RegRange(_)
                if matches!(
                    arg.kind,
                    ArgKind::RegSetFixed | ArgKind::Reg32SetFixed
                ) =>
            {
                self.code.put_u8(ARG_PUSHB);
                let first = self.fixed_set(token, arg.count)?;
                self.emit_reg(first);
            }
            Token::Int(v) => {
                let value = *v as u32;
                if value > 0xFFFF {
                    self.code.put_u8(ARG_PUSHL);
                    self.code.put_u32l(value);
                } else if value > 0xFF {
                    self.code.put_u8(ARG_PUSHW);
                    self.code.put_u16l(value as u16);
                } else {
                    self.code.put_u8(ARG_PUSHB);
                    self.code.put_u8(value as u8);
                }
            }
            Token::Float(f) => {
                self.code.put_u8(ARG_PUSHL);
                self.code.put_u32l(f.to_bits());
            }
            Token::Str(_) | Token::Bin(_) => {
                let bytes = self.string_bytes(token)?;
                self.code.put_u8(ARG_PUSHS);
                self.code.extend_from_slice(&bytes);
            }
            other => return Err(mismatch(arg.kind.describe(), other)),
        }
        Ok(())
    }
}

// token layer ---------------------------------------------------------------

#[derive(Clone, Debug)]
enum RegToken {
    Numeric(u8),
    Named(String, Option<u8>),
}

#[derive(Clone, Debug)]
enum Token {
    Reg(RegToken),
    /// `rA-rB`, expanded to its members
    RegRange(Vec<RegToken>),
    /// `(a, b, c)`
    Tuple(Vec<String>),
    /// `[a, b, c]`
    List(Vec<String>),
    Ident(String),
    AtReg(RegToken),
    AtIdent(String),
    Int(i64),
    Float(f32),
    Str(String),
    Bin(Vec<u8>),
}

fn token_desc(token: &Token) -> String {
    match token {
        Token::Reg(_) | Token::AtReg(_) => "a register".to_owned(),
        Token::RegRange(_) => "a register range".to_owned(),
        Token::Tuple(_) => "a tuple".to_owned(),
        Token::List(_) => "a set".to_owned(),
        Token::Ident(name) | Token::AtIdent(name) => format!("`{name}`"),
        Token::Int(v) => format!("integer {v}"),
        Token::Float(f) => format!("float {f}"),
        Token::Str(_) | Token::Bin(_) => "a string".to_owned(),
    }
}

fn mismatch(expected: &'static str, got: &Token) -> anyhow::Error {
    QuestScriptError::ArgTypeMismatch {
        expected,
        got: token_desc(got),
    }
    .into()
}

fn int_value(token: &Token) -> Result<i64> {
    match token {
        Token::Int(v) => Ok(*v),
        other => Err(mismatch("an integer", other)),
    }
}

/// Split an argument list on top-level commas; quotes, brackets and
/// parentheses protect their contents.
fn split_args(text: &str) -> Result<Vec<String>> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_string {
            current.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                current.push(c);
            }
            '[' | '(' => {
                depth += 1;
                current.push(c);
            }
            ']' | ')' => {
                depth -= 1;
                ensure!(depth >= 0, "unbalanced brackets");
                current.push(c);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_owned());
                current.clear();
            }
            c => current.push(c),
        }
    }
    ensure!(!in_string, "unterminated string literal");
    ensure!(depth == 0, "unbalanced brackets");
    let last = current.trim();
    if !last.is_empty() {
        parts.push(last.to_owned());
    }
    Ok(parts)
}

fn parse_tokens(text: &str) -> Result<Vec<Token>> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    split_args(text)?.iter().map(|part| parse_token(part)).collect()
}

fn parse_token(text: &str) -> Result<Token> {
    if let Some(body) = text.strip_prefix('"') {
        let body = body
            .strip_suffix('"')
            .ok_or_else(|| anyhow!("unterminated string literal"))?;
        return Ok(Token::Str(encoding::unescape(body)?));
    }
    if let Some(body) = text.strip_prefix("bin:\"") {
        let body = body
            .strip_suffix('"')
            .ok_or_else(|| anyhow!("unterminated bin literal"))?;
        let digits: String =
            body.chars().filter(|c| !c.is_whitespace()).collect();
        ensure!(
            digits.len() % 2 == 0,
            "odd number of hex digits in bin literal"
        );
        let mut bytes = Vec::with_capacity(digits.len() / 2);
        for i in (0..digits.len()).step_by(2) {
            bytes.push(
                u8::from_str_radix(&digits[i..i + 2], 16)
                    .map_err(|_| anyhow!("invalid hex in bin literal"))?,
            );
        }
        return Ok(Token::Bin(bytes));
    }
    if let Some(body) =
        text.strip_prefix('[').and_then(|b| b.strip_suffix(']'))
    {
        return Ok(Token::List(split_args(body)?));
    }
    if let Some(body) =
        text.strip_prefix('(').and_then(|b| b.strip_suffix(')'))
    {
        return Ok(Token::Tuple(split_args(body)?));
    }
    if let Some(body) = text.strip_prefix('@') {
        return match parse_reg_token(body)? {
            Some(reg) => Ok(Token::AtReg(reg)),
            None if is_ident(body) => Ok(Token::AtIdent(body.to_owned())),
            None => Err(anyhow!("expected @register or @label, got @{body}")),
        };
    }
    if let Some((left, right)) = text.split_once('-') {
        if let (Ok(Some(a)), Ok(Some(b))) =
            (parse_reg_token(left), parse_reg_token(right))
        {
            return expand_reg_range(a, b);
        }
    }
    if let Some(reg) = parse_reg_token(text)? {
        return Ok(Token::Reg(reg));
    }
    if let Ok(value) = parse_int(text) {
        return Ok(Token::Int(value));
    }
    if let Ok(value) = text.parse::<f32>() {
        return Ok(Token::Float(value));
    }
    ensure!(
        is_ident(text),
        QuestScriptError::ArgTypeMismatch {
            expected: "an argument",
            got: text.to_owned(),
        }
    );
    Ok(Token::Ident(text.to_owned()))
}

fn parse_reg_element(text: &str) -> Result<RegToken> {
    parse_reg_token(text)?.ok_or_else(|| {
        QuestScriptError::ArgTypeMismatch {
            expected: "a register",
            got: text.to_owned(),
        }
        .into()
    })
}

/// `rN` / `fN` (same namespace) / `r:name` / `r:name@N`.
fn parse_reg_token(text: &str) -> Result<Option<RegToken>> {
    if let Some(body) = text.strip_prefix("r:") {
        let (name, pin) = match body.split_once('@') {
            Some((name, pin)) => {
                let pin = parse_int(pin)?;
                let pin = u8::try_from(pin)
                    .map_err(|_| anyhow!("register pin {pin} out of range"))?;
                (name, Some(pin))
            }
            None => (body, None),
        };
        ensure!(is_ident(name), "invalid register name r:{name}");
        return Ok(Some(RegToken::Named(name.to_owned(), pin)));
    }
    let Some(digits) = text.strip_prefix(&['r', 'f'][..]) else {
        return Ok(None);
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Ok(None);
    }
    let number: u32 = digits.parse()?;
    let number = u8::try_from(number)
        .map_err(|_| anyhow!("register number {number} out of range"))?;
    Ok(Some(RegToken::Numeric(number)))
}

fn expand_reg_range(a: RegToken, b: RegToken) -> Result<Token> {
    let (RegToken::Numeric(first), RegToken::Numeric(last)) = (&a, &b) else {
        return Err(anyhow!("register ranges take numeric registers"));
    };
    ensure!(first <= last, "descending register range");
    Ok(Token::RegRange(
        (*first..=*last).map(RegToken::Numeric).collect(),
    ))
}

fn parse_quoted(text: &str) -> Result<String> {
    match parse_token(text)? {
        Token::Str(s) => Ok(s),
        other => Err(mismatch("a string", &other)),
    }
}

/// C-style integer literal: `0x` hex, leading-zero octal, decimal, with an
/// optional sign.
fn parse_int(text: &str) -> Result<i64> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(body) => (true, body),
        None => (false, text),
    };
    ensure!(!body.is_empty(), "empty numeric literal");
    let value = if let Some(hex) = body
        .strip_prefix("0x")
        .or_else(|| body.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16)?
    } else if body != "0" && body.starts_with('0') {
        i64::from_str_radix(&body[1..], 8)?
    } else {
        body.parse::<i64>()?
    };
    Ok(if negative { -value } else { value })
}
