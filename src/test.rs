use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::asm::register::RegisterBank;
use crate::encoding::{self, TextEncoding};
use crate::error::QuestScriptError;
use crate::header::{HeaderKind, QuestMeta};
use crate::opcode::flag;
use crate::*;

fn assemble_src(src: &str) -> AssembledQuest {
    crate::assemble(src, &AssembleOptions::default()).unwrap()
}

fn header_field(quest: &AssembledQuest, offset: usize) -> usize {
    u32::from_le_bytes(quest.data[offset..offset + 4].try_into().unwrap())
        as usize
}

fn code_of(quest: &AssembledQuest) -> &[u8] {
    let code_offset = header_field(quest, 0);
    let function_table_offset = header_field(quest, 4);
    &quest.data[code_offset..function_table_offset]
}

fn table_of(quest: &AssembledQuest) -> Vec<u32> {
    let function_table_offset = header_field(quest, 4);
    let size = header_field(quest, 8);
    quest.data[function_table_offset..size]
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes(c.try_into().unwrap()))
        .collect()
}

fn kind_of(err: &anyhow::Error) -> Option<&QuestScriptError> {
    err.downcast_ref::<QuestScriptError>()
}

// opcode dictionary ---------------------------------------------------------

#[test]
fn dictionary_has_no_duplicates() {
    for build in ALL_BUILDS {
        opcode::index_for(build).unwrap();
    }
}

#[test]
fn dictionary_pins() {
    let v2 = opcode::index_for(Build::DcV2).unwrap();
    let def = v2.by_name("get_difficulty_level_v2").unwrap();
    assert_eq!(def.opcode, 0xF808);
    assert_eq!(v2.by_name("get_difflvl").unwrap().opcode, 0xF808);
    // 0x00AB never shipped in any build
    for build in ALL_BUILDS {
        assert!(opcode::index_for(build)
            .unwrap()
            .by_opcode(0x00AB)
            .is_none());
    }
    let v4 = opcode::index_for(Build::BbV4).unwrap();
    assert!(v4.by_name("ret").unwrap().is(flag::F_RET));
    let set_episode = v4.by_name("set_episode").unwrap();
    assert!(set_episode.is(flag::F_SET_EPISODE));
    assert!(set_episode.is(flag::F_ARGS));
    // opcode number reuse across disjoint version buckets
    let v1 = opcode::index_for(Build::DcV1).unwrap();
    assert_eq!(v1.by_opcode(0x000A).unwrap().name, "leta");
    assert_eq!(v4.by_opcode(0x000A).unwrap().name, "letb");
}

#[test]
fn patch_builds_are_inert() {
    let err = crate::assemble(
        ".version BB_V4\n.quest_num 1\n.name \"x\"\nstart:\n  ret\n",
        &AssembleOptions {
            build_override: Some(Build::PcPatch),
            ..AssembleOptions::default()
        },
    )
    .unwrap_err();
    assert!(matches!(
        kind_of(&err),
        Some(QuestScriptError::UnknownBuild(_))
    ));
}

// scenario 1: minimal program round-trips byte for byte --------------------

#[test]
fn minimal_program_round_trip() {
    let src = "\
.version BB_V4
.quest_num 1
.name \"Hi\"
start:
  nop
  ret
";
    let first = assemble_src(src);
    assert_eq!(first.build, Build::BbV4);
    assert_eq!(code_of(&first), &[0x00, 0x01, 0x00, 0x00]);

    let listing = crate::disassemble(
        &first.data,
        Build::BbV4,
        &DisassembleOptions::default(),
    )
    .unwrap();
    assert!(listing.contains("nop"));
    assert!(listing.contains("ret"));

    let second = assemble_src(&listing);
    assert_eq!(first.data, second.data);
}

// scenario 2: episode detection --------------------------------------------

#[rstest]
#[case(0, Episode::Episode1)]
#[case(1, Episode::Episode2)]
#[case(2, Episode::Episode4)]
fn episode_detector_literal(#[case] literal: u8, #[case] expected: Episode) {
    let src = format!(
        ".version BB_V4\n.quest_num 1\n.name \"e\"\nstart:\n  \
         set_episode {literal}\n  ret\n"
    );
    let quest = assemble_src(&src);
    let episode =
        crate::find_episode(&quest.data, Build::BbV4, None).unwrap();
    assert_eq!(episode, expected);
}

#[test]
fn episode_detector_invalid_literal() {
    let src = ".version BB_V4\n.quest_num 1\n.name \"e\"\nstart:\n  \
               set_episode 3\n  ret\n";
    let quest = assemble_src(src);
    let err = crate::find_episode(&quest.data, Build::BbV4, None).unwrap_err();
    assert!(matches!(
        kind_of(&err),
        Some(QuestScriptError::MalformedBinary { .. })
    ));
}

#[test]
fn episode_detector_multiple() {
    let src = ".version BB_V4\n.quest_num 1\n.name \"e\"\nstart:\n  \
               set_episode 1\n  set_episode 2\n  ret\n";
    let quest = assemble_src(src);
    let err = crate::find_episode(&quest.data, Build::BbV4, None).unwrap_err();
    assert!(matches!(
        kind_of(&err),
        Some(QuestScriptError::MultipleEpisodes)
    ));
}

#[test]
fn episode_detector_header_fallback() {
    let src = ".version BB_V4\n.quest_num 1\n.name \"e\"\n.episode 1\n\
               start:\n  nop\n  ret\n";
    let quest = assemble_src(src);
    let episode =
        crate::find_episode(&quest.data, Build::BbV4, None).unwrap();
    assert_eq!(episode, Episode::Episode2);
}

// scenario 3: two-byte opcode ----------------------------------------------

#[test]
fn two_byte_opcode_direct() {
    let src = ".version DC_V2\n.quest_num 1\n.name \"t\"\nstart:\n  \
               get_difficulty_level_v2 r5\n  ret\n";
    let quest = assemble_src(src);
    assert_eq!(
        &code_of(&quest)[..4],
        &[
            0xF8, 0x08, // two-byte opcode, big-endian on the wire
            0x05, // r5
            0x01, // ret
        ]
    );
}

// scenario 4: push-args dispatch -------------------------------------------

#[test]
fn push_args_dispatch() {
    let src = ".version GC_V3\n.quest_num 1\n.name \"m\"\nstart:\n  \
               message 0x12, \"hello\"\n  ret\n";
    let quest = assemble_src(src);
    assert_eq!(
        code_of(&quest),
        &[
            0x4B, 0x12, // arg_pushb 0x12
            0x4E, b'h', b'e', b'l', b'l', b'o', 0x00, // arg_pushs "hello"
            0xF8, 0x50, // message
            0x01, // ret
        ]
    );
}

#[test]
fn push_args_fold_round_trip() {
    let src = ".version GC_V3\n.quest_num 1\n.name \"m\"\nstart:\n  \
               message 0x12, \"hello\"\n  ret\n";
    let first = assemble_src(src);
    let listing = crate::disassemble(
        &first.data,
        Build::GcV3,
        &DisassembleOptions::default(),
    )
    .unwrap();
    // pushes fold back into the consumer in round-trippable output
    assert!(listing.contains("message"));
    assert!(!listing.contains("arg_pushb"));
    let second = assemble_src(&listing);
    assert_eq!(first.data, second.data);
}

#[test]
fn push_args_mismatch_is_tolerated() {
    // hand-crafted: one push, then a two-argument consumer
    let src = ".version GC_V3\n.quest_num 1\n.name \"m\"\nstart:\n  \
               .data 4B 01 F8 50\n  ret\n";
    let quest = assemble_src(src);
    let listing = crate::disassemble(
        &quest.data,
        Build::GcV3,
        &DisassembleOptions::default(),
    )
    .unwrap();
    assert!(listing.contains("arg_pushb"));
    assert!(listing.contains("arg stack holds 1 value(s)"));
}

// scenario 5: register adjacency -------------------------------------------

#[test]
fn register_adjacency() {
    let src = ".version DC_V2\n.quest_num 1\n.name \"r\"\nstart:\n  \
               get_coord_of_player (r:b, r:c, r:d), r:a\n  ret\n";
    let quest = assemble_src(src);
    let code = code_of(&quest);
    // F8 0A, first register of the set, the destination register
    assert_eq!(&code[..2], &[0xF8, 0x0A]);
    let set_first = code[2];
    let dest = code[3];
    assert_ne!(set_first, dest);
    // b, c, d were placed as one window, a outside it
    assert!(dest < set_first || dest > set_first + 2);
    let listing = crate::disassemble(
        &quest.data,
        Build::DcV2,
        &DisassembleOptions::default(),
    )
    .unwrap();
    assert!(listing
        .contains(&format!("r{}-r{}", set_first, set_first + 2)));
}

#[test]
fn register_pin_respected() {
    let src = ".version DC_V2\n.quest_num 1\n.name \"r\"\nstart:\n  \
               set r:a@10\n  clear r:a\n  ret\n";
    let quest = assemble_src(src);
    assert_eq!(
        &code_of(&quest)[..5],
        &[
            0x10, 10, // set r10
            0x11, 10, // clear r10
            0x01, // ret
        ]
    );
}

#[test]
fn register_pin_conflict() {
    let src = ".version DC_V2\n.quest_num 1\n.name \"r\"\nstart:\n  \
               set r:a@5\n  set r:b@5\n  ret\n";
    let err =
        crate::assemble(src, &AssembleOptions::default()).unwrap_err();
    assert!(matches!(
        kind_of(&err),
        Some(QuestScriptError::RegisterConflict(_))
    ));
}

#[test]
fn register_adjacency_conflict() {
    let src = ".version DC_V2\n.quest_num 1\n.name \"r\"\nstart:\n  \
               get_coord_of_player (r1, r2, r4), r0\n  ret\n";
    let err =
        crate::assemble(src, &AssembleOptions::default()).unwrap_err();
    assert!(matches!(
        kind_of(&err),
        Some(QuestScriptError::RegisterConflict(_))
    ));
}

// scenario 6: unknown opcode tolerance -------------------------------------

#[test]
fn unknown_opcode_tolerated() {
    let src = ".version DC_V1\n.quest_num 1\n.name \"u\"\nstart:\n  \
               .data AB\n  ret\n";
    let quest = assemble_src(src);
    let listing = crate::disassemble(
        &quest.data,
        Build::DcV1,
        &DisassembleOptions::default(),
    )
    .unwrap();
    assert!(listing.contains(".unknown 00AB"));
}

// label handling ------------------------------------------------------------

#[test]
fn function_table_sentinel() {
    let src = "\
.version DC_V2
.quest_num 1
.name \"s\"
start:
  jmp label0002
label0002@2:
  ret
";
    let quest = assemble_src(src);
    let table = table_of(&quest);
    assert_eq!(table.len(), 3);
    assert_eq!(table[0], 0);
    assert_eq!(table[1], 0xFFFF_FFFF);
    assert_eq!(table[2], 3); // jmp is 1 + 2 bytes

    let listing = crate::disassemble(
        &quest.data,
        Build::DcV2,
        &DisassembleOptions::default(),
    )
    .unwrap();
    let second = assemble_src(&listing);
    assert_eq!(quest.data, second.data);
}

#[test]
fn duplicate_label_rejected() {
    let src = ".version DC_V2\n.quest_num 1\n.name \"d\"\nstart:\n  ret\n\
               foo:\n  ret\nfoo:\n  ret\n";
    let err =
        crate::assemble(src, &AssembleOptions::default()).unwrap_err();
    assert!(matches!(
        kind_of(&err),
        Some(QuestScriptError::DuplicateLabel(_))
    ));
}

#[test]
fn duplicate_index_rejected() {
    let src = ".version DC_V2\n.quest_num 1\n.name \"d\"\nstart:\n  ret\n\
               foo@3:\n  ret\nbar@3:\n  ret\n";
    let err =
        crate::assemble(src, &AssembleOptions::default()).unwrap_err();
    assert!(matches!(
        kind_of(&err),
        Some(QuestScriptError::DuplicateIndex { index: 3, .. })
    ));
}

#[test]
fn undefined_label_rejected() {
    let src = ".version DC_V2\n.quest_num 1\n.name \"d\"\nstart:\n  \
               jmp nowhere\n  ret\n";
    let err =
        crate::assemble(src, &AssembleOptions::default()).unwrap_err();
    assert!(matches!(
        kind_of(&err),
        Some(QuestScriptError::UndefinedLabel(_))
    ));
}

#[test]
fn missing_start_rejected() {
    let src = ".version DC_V2\n.quest_num 1\n.name \"d\"\nmain:\n  ret\n";
    let err =
        crate::assemble(src, &AssembleOptions::default()).unwrap_err();
    assert!(matches!(
        kind_of(&err),
        Some(QuestScriptError::UndefinedLabel(name)) if name == "start"
    ));
}

// front-end -----------------------------------------------------------------

#[test]
fn unterminated_comment_rejected() {
    let src = ".version DC_V2\n.quest_num 1\n.name \"c\"\n/* open\nstart:\n";
    let err =
        crate::assemble(src, &AssembleOptions::default()).unwrap_err();
    assert!(matches!(
        kind_of(&err),
        Some(QuestScriptError::UnterminatedComment)
    ));
}

#[test]
fn comments_and_slashes_in_strings() {
    let src = "\
.version DC_V2
.quest_num 1
.name \"c\" // trailing comment
start:
  /* mid-line */ window_msg \"http://a//b\"
  ret
";
    let quest = assemble_src(src);
    let listing = crate::disassemble(
        &quest.data,
        Build::DcV2,
        &DisassembleOptions::default(),
    )
    .unwrap();
    assert!(listing.contains("http://a//b"));
}

#[test]
fn missing_directives_rejected() {
    let err = crate::assemble(
        ".version DC_V2\n.name \"x\"\nstart:\n  ret\n",
        &AssembleOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        kind_of(&err),
        Some(QuestScriptError::MissingDirective(".quest_num"))
    ));

    let err = crate::assemble(
        "start:\n  ret\n",
        &AssembleOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        kind_of(&err),
        Some(QuestScriptError::UnknownBuild(_))
    ));
}

#[test]
fn unknown_mnemonic_rejected() {
    // mod is a V3 addition, DC_V1 never had it
    let src = ".version DC_V1\n.quest_num 1\n.name \"x\"\nstart:\n  \
               mod r1, r2\n  ret\n";
    let err =
        crate::assemble(src, &AssembleOptions::default()).unwrap_err();
    assert!(matches!(
        kind_of(&err),
        Some(QuestScriptError::UnknownMnemonic(_))
    ));
}

#[test]
fn line_context_reported() {
    let src = ".version DC_V2\n.quest_num 1\n.name \"x\"\nstart:\n  \
               bogus_opcode\n  ret\n";
    let err =
        crate::assemble(src, &AssembleOptions::default()).unwrap_err();
    assert!(format!("{err:#}").contains("(line 5)"));
}

#[test]
fn native_include_requires_backend() {
    let dir = std::env::temp_dir().join("qst-rs-native-test");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("stub.s"), "nop\n").unwrap();
    let src = ".version GC_V3\n.quest_num 1\n.name \"n\"\nstart:\n  \
               .include_native stub.s\n  ret\n";
    let err = crate::assemble(
        src,
        &AssembleOptions {
            include_dir: Some(dir),
            ..AssembleOptions::default()
        },
    )
    .unwrap_err();
    assert!(matches!(
        kind_of(&err),
        Some(QuestScriptError::ExternalAssemblerMissing("PPC"))
    ));
}

// argument forms ------------------------------------------------------------

#[test]
fn switch_jmp_label_set() {
    let src = "\
.version DC_V2
.quest_num 1
.name \"s\"
start:
  switch_jmp r7, [one, two]
  ret
one:
  ret
two:
  ret
";
    let first = assemble_src(src);
    let code = code_of(&first);
    assert_eq!(
        &code[..7],
        &[
            0x40, // switch_jmp
            0x07, // r7
            0x02, // two labels
            0x01, 0x00, // one -> index 1
            0x02, 0x00, // two -> index 2
        ]
    );
    let listing = crate::disassemble(
        &first.data,
        Build::DcV2,
        &DisassembleOptions::default(),
    )
    .unwrap();
    let second = assemble_src(&listing);
    assert_eq!(first.data, second.data);
}

#[test]
fn reg_set_and_floats() {
    let src = ".version DC_V2\n.quest_num 1\n.name \"f\"\nstart:\n  \
               jmp_on label0001, [r1, r250]\n  \
               set_quake_intensity 1.5, -2.0\n  ret\nlabel0001:\n  ret\n";
    let first = assemble_src(src);
    let code = code_of(&first);
    assert_eq!(
        &code[..6],
        &[
            0x2A, // jmp_on
            0x01, 0x00, // label0001 -> index 1
            0x02, 0x01, 0xFA, // [r1, r250]
        ]
    );
    assert_eq!(&code[6..8], &[0xF8, 0x33]); // set_quake_intensity
    assert_eq!(&code[8..12], &1.5f32.to_le_bytes());
    assert_eq!(&code[12..16], &(-2.0f32).to_le_bytes());
    let listing = crate::disassemble(
        &first.data,
        Build::DcV2,
        &DisassembleOptions::default(),
    )
    .unwrap();
    assert!(listing.contains("1.5"));
    let second = assemble_src(&listing);
    assert_eq!(first.data, second.data);
}

#[test]
fn push_args_at_forms() {
    let src = "\
.version BB_V4
.quest_num 1
.name \"p\"
start:
  p_setpos 0x0, @r7
  npc_param @stats, 0x10000
  ret
stats:
  .data 01 00 02 00 03 00 04 00 05 00 06 00 07 00
";
    let quest = assemble_src(src);
    let code = code_of(&quest);
    assert_eq!(
        &code[..4],
        &[
            0x4B, 0x00, // arg_pushb 0
            0x4C, 0x07, // arg_pusha r7
        ]
    );
    assert_eq!(code[4], 0x63); // p_setpos
    assert_eq!(
        &code[5..13],
        &[
            0x4D, 0x01, 0x00, // arg_pusho stats (index 1)
            0x49, 0x00, 0x00, 0x01, 0x00, // arg_pushl 0x10000
        ]
    );
    assert_eq!(code[13], 0x5E); // npc_param
}

// data labels and annotated mode -------------------------------------------

#[test]
fn data_label_typing() {
    let src = "\
.version DC_V2
.quest_num 1
.name \"v\"
start:
  npc_crp r1, vis
  ret
vis:
  .data 41 42 43 00
";
    let quest = assemble_src(src);
    let plain = crate::disassemble(
        &quest.data,
        Build::DcV2,
        &DisassembleOptions::default(),
    )
    .unwrap();
    // round-trippable mode suppresses interpretations, keeps .data
    assert!(plain.contains(".data 41 42 43 00"));
    assert!(!plain.contains("PlayerVisualConfig"));

    let annotated = crate::disassemble(
        &quest.data,
        Build::DcV2,
        &DisassembleOptions {
            annotated: true,
            ..DisassembleOptions::default()
        },
    )
    .unwrap();
    assert!(annotated.contains("as PlayerVisualConfig"));
    assert!(annotated.contains("Referenced by"));
    // four bytes are too short for the struct
    assert!(annotated.contains("too short"));

    let second = assemble_src(&plain);
    assert_eq!(quest.data, second.data);
}

#[test]
fn dual_script_and_data_label() {
    // dual is jumped to (SCRIPT) and referenced as visual-config data
    let src = "\
.version DC_V2
.quest_num 1
.name \"d\"
start:
  npc_crp r1, dual
  jmp dual
dual:
  ret
";
    let quest = assemble_src(src);
    let annotated = crate::disassemble(
        &quest.data,
        Build::DcV2,
        &DisassembleOptions {
            annotated: true,
            ..DisassembleOptions::default()
        },
    )
    .unwrap();
    // the bytes decode as code and the data interpretation still renders
    assert!(annotated.contains("as PlayerVisualConfig"));
    let dual_pos = annotated.find("label0001@1:").unwrap();
    assert!(annotated[dual_pos..].contains("ret"));

    let plain = crate::disassemble(
        &quest.data,
        Build::DcV2,
        &DisassembleOptions::default(),
    )
    .unwrap();
    assert!(!plain.contains("PlayerVisualConfig"));
    let second = assemble_src(&plain);
    assert_eq!(quest.data, second.data);
}

#[test]
fn qedit_names_selectable() {
    let src = ".version DC_V2\n.quest_num 1\n.name \"q\"\nstart:\n  \
               jmpi_eq r1, 0x5, start\n  ret\n";
    let quest = assemble_src(src);
    let plain = crate::disassemble(
        &quest.data,
        Build::DcV2,
        &DisassembleOptions::default(),
    )
    .unwrap();
    assert!(plain.contains("jmpi_eq"));
    let qedit = crate::disassemble(
        &quest.data,
        Build::DcV2,
        &DisassembleOptions {
            qedit_names: true,
            ..DisassembleOptions::default()
        },
    )
    .unwrap();
    assert!(qedit.contains("jmpi_="));
    // the qedit spelling assembles too
    let second = assemble_src(&qedit);
    assert_eq!(quest.data, second.data);
}

// a richer program through the whole pipeline ------------------------------

#[test]
fn full_round_trip_bb() {
    let src = "\
.version BB_V4
.quest_num 0x20
.name \"Towards the Future\"
.language 1
.episode 1
.max_players 4
.joinable
.short_desc \"short\"
.long_desc \"long text\"
start:
  leti r60, 0xFF
  message 0x1, \"hi\"
  window_msg \"wm\"
  p_setpos 0x0, mov
  jmpi_eq r60, 0xFF, done
  ret
done@5:
  set_episode 1
  ret
mov:
  .data 00 00 80 3F 00 00 80 3F 00 00 80 3F
  .data 00 00 80 3F 00 00 80 3F 00 00 80 3F
";
    let first = assemble_src(src);
    let listing = crate::disassemble(
        &first.data,
        Build::BbV4,
        &DisassembleOptions::default(),
    )
    .unwrap();
    let second = assemble_src(&listing);
    assert_eq!(first.data, second.data);

    let annotated = crate::disassemble(
        &first.data,
        Build::BbV4,
        &DisassembleOptions {
            annotated: true,
            ..DisassembleOptions::default()
        },
    )
    .unwrap();
    assert!(annotated.contains("as MovementData"));
    // six 1.0 floats
    assert!(annotated.contains("idle_move_speed"));
}

// headers -------------------------------------------------------------------

#[rstest]
#[case(Build::DcNte, HeaderKind::Nte, 0x30)]
#[case(Build::DcV2, HeaderKind::Dc, 0x1D4)]
#[case(Build::PcV2, HeaderKind::Pc, 0x394)]
#[case(Build::GcV3, HeaderKind::Gc, 0x1D4)]
#[case(Build::BbV4, HeaderKind::Bb, 0x398)]
fn header_round_trip(
    #[case] build: Build,
    #[case] kind: HeaderKind,
    #[case] size: usize,
) {
    assert_eq!(build.header_kind().unwrap(), kind);
    assert_eq!(kind.size(), size);
    let meta = QuestMeta {
        code_offset: size as u32,
        function_table_offset: size as u32,
        size: size as u32,
        quest_number: 0x42,
        episode: Episode::Episode2,
        name: "Quest".to_owned(),
        short_description: "a short one".to_owned(),
        long_description: "a longer one".to_owned(),
        max_players: 2,
        joinable: true,
        ..QuestMeta::default()
    };
    let packed = crate::header::emit(&meta, build).unwrap();
    assert_eq!(packed.len(), size);
    let parsed = crate::header::parse(&packed, build, None).unwrap();
    assert_eq!(parsed.name, meta.name);
    if kind != HeaderKind::Nte {
        assert_eq!(parsed.quest_number, 0x42);
        assert_eq!(parsed.short_description, meta.short_description);
        assert_eq!(parsed.long_description, meta.long_description);
    }
    if matches!(kind, HeaderKind::Gc | HeaderKind::Bb) {
        assert_eq!(parsed.episode, Episode::Episode2);
    }
    if kind == HeaderKind::Bb {
        assert_eq!(parsed.max_players, 2);
        assert!(parsed.joinable);
    }
}

#[test]
fn header_rejects_bad_regions() {
    let src = ".version DC_V2\n.quest_num 1\n.name \"h\"\nstart:\n  ret\n";
    let mut data = assemble_src(src).data;
    // point the function table past the buffer
    data[4..8].copy_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
    let err = crate::disassemble(
        &data,
        Build::DcV2,
        &DisassembleOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        kind_of(&err),
        Some(QuestScriptError::MalformedBinary { .. })
    ));
}

// text encodings ------------------------------------------------------------

#[rstest]
#[case(TextEncoding::ShiftJis, "カタカナ quest")]
#[case(TextEncoding::Latin1, "déjà vu")]
#[case(TextEncoding::Utf16Le, "héllo \u{1F3AE}")]
fn encoding_fidelity(#[case] encoding: TextEncoding, #[case] text: &str) {
    let wire = encoding.encode(text);
    let decoded = encoding.decode(&wire);
    assert_eq!(encoding.encode(&decoded), wire);
    assert_eq!(decoded, text);
}

#[test]
fn escape_round_trip() {
    let text = "line\nwith\t\"quotes\" and \\ bars\x01";
    let escaped = encoding::escape(text);
    let body = &escaped[1..escaped.len() - 1];
    assert_eq!(encoding::unescape(body).unwrap(), text);
}

#[test]
fn build_encodings() {
    assert_eq!(
        Build::DcV2.text_encoding(0),
        TextEncoding::ShiftJis
    );
    assert_eq!(Build::DcV2.text_encoding(1), TextEncoding::Latin1);
    assert_eq!(Build::PcV2.text_encoding(0), TextEncoding::Utf16Le);
    assert_eq!(Build::BbV4.text_encoding(3), TextEncoding::Utf16Le);
    assert_eq!(Build::XbV3.text_encoding(0), TextEncoding::ShiftJis);
}

#[test]
fn binary_string_literal() {
    // 0x80 alone is not a valid Shift-JIS sequence
    let src = ".version DC_V2\n.quest_num 1\n.name \"b\"\n.language 0\n\
               start:\n  window_msg bin:\"80FE\"\n  ret\n";
    let first = assemble_src(src);
    let listing = crate::disassemble(
        &first.data,
        Build::DcV2,
        &DisassembleOptions::default(),
    )
    .unwrap();
    assert!(listing.contains("bin:\"80FE\""));
    let second = assemble_src(&listing);
    assert_eq!(first.data, second.data);
}

// register allocator --------------------------------------------------------

#[test]
fn allocator_back_computes_from_pin() {
    let mut bank = RegisterBank::default();
    let a = bank.named("a", None).unwrap();
    let b = bank.named("b", Some(10)).unwrap();
    bank.constrain(a, b).unwrap();
    let mut code = vec![0u8; 2];
    bank.record_patch(a, 0);
    bank.record_patch(b, 1);
    bank.assign_all(&mut code).unwrap();
    assert_eq!(code, vec![9, 10]);
}

#[test]
fn allocator_avoids_used_slots() {
    let mut bank = RegisterBank::default();
    let _r0 = bank.numeric(0);
    let _r1 = bank.numeric(1);
    let a = bank.named("a", None).unwrap();
    let b = bank.named("b", None).unwrap();
    bank.constrain(a, b).unwrap();
    let mut code = vec![0u8; 2];
    bank.record_patch(a, 0);
    bank.record_patch(b, 1);
    bank.assign_all(&mut code).unwrap();
    assert_eq!(code, vec![2, 3]);
}

#[test]
fn allocator_exhaustion() {
    let mut bank = RegisterBank::default();
    for n in 0..=255u8 {
        bank.numeric(n);
    }
    bank.named("a", None).unwrap();
    let err = bank.assign_all(&mut []).unwrap_err();
    assert!(matches!(
        kind_of(&err),
        Some(QuestScriptError::RegisterConflict(_))
    ));
}

#[test]
fn allocator_overlong_chain() {
    let mut bank = RegisterBank::default();
    let mut prev = bank.named("a", None).unwrap();
    for _ in 0..300 {
        let next = bank.anonymous();
        bank.constrain(prev, next).unwrap();
        prev = next;
    }
    let err = bank.assign_all(&mut []).unwrap_err();
    assert!(matches!(
        kind_of(&err),
        Some(QuestScriptError::RegisterConflict(_))
    ));
}

// PRS -----------------------------------------------------------------------

#[test]
fn prs_literals() {
    let stream = [
        0x17, // control bits: three literals, then a long copy
        b'a', b'b', b'c',
        0x00, 0x00, // long-copy zero word terminates the stream
    ];
    assert_eq!(
        crate::prs::decompress(&stream, 1 << 10).unwrap(),
        b"abc"
    );
}

#[test]
fn prs_short_copy() {
    let stream = [
        0x83, // two literals, a short copy of two, end of stream
        b'a', b'b',
        0xFE, // copy from offset -2
        0x00, 0x00,
    ];
    assert_eq!(
        crate::prs::decompress(&stream, 1 << 10).unwrap(),
        b"abab"
    );
}

#[test]
fn prs_truncated() {
    let err = crate::prs::decompress(&[0x01], 1 << 10).unwrap_err();
    assert!(matches!(
        kind_of(&err),
        Some(QuestScriptError::MalformedBinary { .. })
    ));
}
