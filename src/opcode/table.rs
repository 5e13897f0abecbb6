//! The opcode dictionary. One row per opcode variant; rows sharing an
//! opcode number are split by disjoint version masks and the per-build
//! index picks the active one.

use super::flag::*;
use super::{ArgDef, ArgKind, DataKind, OpDef};

const REG: ArgDef = ArgDef::plain(ArgKind::Reg);
const REG32: ArgDef = ArgDef::plain(ArgKind::Reg32);
const REG_SET: ArgDef = ArgDef::plain(ArgKind::RegSet);
const I8: ArgDef = ArgDef::plain(ArgKind::Int8);
const I16: ArgDef = ArgDef::plain(ArgKind::Int16);
const I32: ArgDef = ArgDef::plain(ArgKind::Int32);
const F32: ArgDef = ArgDef::plain(ArgKind::Float32);
const STR: ArgDef = ArgDef::plain(ArgKind::CString);
const SCRIPT: ArgDef = ArgDef::label16(DataKind::Script);
const SCRIPT_SET: ArgDef = ArgDef::label16_set(DataKind::Script);
const LABEL: ArgDef = ArgDef::label16(DataKind::None);
const DATA: ArgDef = ArgDef::label16(DataKind::Data);
const CSTR: ArgDef = ArgDef::label16(DataKind::CString);
const PSTATS: ArgDef = ArgDef::label16(DataKind::PlayerStats);
const PVIS: ArgDef = ArgDef::label16(DataKind::PlayerVisualConfig);
const RESIST: ArgDef = ArgDef::label16(DataKind::ResistData);
const ATTACK: ArgDef = ArgDef::label16(DataKind::AttackData);
const MOVE: ArgDef = ArgDef::label16(DataKind::MovementData);
const IMAGE32: ArgDef = ArgDef::label32(DataKind::ImageData);
const F8F2DATA32: ArgDef = ArgDef::label32(DataKind::UnknownF8F2Data);
const REGS2: ArgDef = ArgDef::reg_set_fixed(2);
const REGS3: ArgDef = ArgDef::reg_set_fixed(3);
const REGS4: ArgDef = ArgDef::reg_set_fixed(4);
const REGS5: ArgDef = ArgDef::reg_set_fixed(5);
const REGS6: ArgDef = ArgDef::reg_set_fixed(6);
const REG32S3: ArgDef = ArgDef::reg32_set_fixed(3);
const REG32S4: ArgDef = ArgDef::reg32_set_fixed(4);

const fn def(
    opcode: u16,
    name: &'static str,
    args: &'static [ArgDef],
    flags: u16,
) -> OpDef {
    OpDef {
        opcode,
        name,
        qedit_name: None,
        args,
        flags,
    }
}

const fn defq(
    opcode: u16,
    name: &'static str,
    qedit_name: &'static str,
    args: &'static [ArgDef],
    flags: u16,
) -> OpDef {
    OpDef {
        opcode,
        name,
        qedit_name: Some(qedit_name),
        args,
        flags,
    }
}

#[rustfmt::skip]
pub static OPCODES: &[OpDef] = &[
    // control
    def(0x0000, "nop", &[], V0_V4),
    def(0x0001, "ret", &[], V0_V4 | F_RET),
    def(0x0002, "sync", &[], V0_V4),
    def(0x0003, "exit", &[I32], V0_V4 | F_ARGS),
    def(0x0004, "thread", &[SCRIPT], V0_V4),
    def(0x0005, "va_start", &[], V3_V4),
    def(0x0006, "va_end", &[], V3_V4),
    def(0x0007, "va_call", &[SCRIPT], V3_V4),

    // register moves; 0x0A..0x0D were reassigned when the typed loads
    // appeared in V3
    def(0x0008, "let", &[REG, REG], V0_V4),
    def(0x0009, "leti", &[REG, I32], V0_V4),
    def(0x000A, "leta", &[REG, REG], V0_V2),
    def(0x000A, "letb", &[REG, I8], V3_V4),
    def(0x000B, "letw", &[REG, I16], V3_V4),
    def(0x000C, "leta", &[REG, REG], V3_V4),
    def(0x000D, "leto", &[REG, SCRIPT], V3_V4),

    // flag registers
    def(0x0010, "set", &[REG], V0_V4),
    def(0x0011, "clear", &[REG], V0_V4),
    def(0x0012, "rev", &[REG], V0_V4),
    def(0x0013, "gset", &[I16], V0_V4),
    def(0x0014, "gclear", &[I16], V0_V4),
    def(0x0015, "grev", &[I16], V0_V4),
    def(0x0016, "glet", &[I16, REG], V0_V4),
    def(0x0017, "gget", &[I16, REG], V0_V4),

    // arithmetic
    def(0x0018, "add", &[REG, REG], V0_V4),
    def(0x0019, "addi", &[REG, I32], V0_V4),
    def(0x001A, "sub", &[REG, REG], V0_V4),
    def(0x001B, "subi", &[REG, I32], V0_V4),
    def(0x001C, "mul", &[REG, REG], V0_V4),
    def(0x001D, "muli", &[REG, I32], V0_V4),
    def(0x001E, "div", &[REG, REG], V0_V4),
    def(0x001F, "divi", &[REG, I32], V0_V4),
    def(0x0020, "and", &[REG, REG], V0_V4),
    def(0x0021, "andi", &[REG, I32], V0_V4),
    def(0x0022, "or", &[REG, REG], V0_V4),
    def(0x0023, "ori", &[REG, I32], V0_V4),
    def(0x0024, "xor", &[REG, REG], V0_V4),
    def(0x0025, "xori", &[REG, I32], V0_V4),
    def(0x0026, "mod", &[REG, REG], V3_V4),
    def(0x0027, "modi", &[REG, I32], V3_V4),

    // jumps
    def(0x0028, "jmp", &[SCRIPT], V0_V4),
    def(0x0029, "call", &[SCRIPT], V0_V4),
    def(0x002A, "jmp_on", &[SCRIPT, REG_SET], V0_V4),
    def(0x002B, "jmp_off", &[SCRIPT, REG_SET], V0_V4),
    defq(0x002C, "jmp_eq", "jmp_=", &[REG, REG, SCRIPT], V0_V4),
    defq(0x002D, "jmpi_eq", "jmpi_=", &[REG, I32, SCRIPT], V0_V4),
    defq(0x002E, "jmp_ne", "jmp_!=", &[REG, REG, SCRIPT], V0_V4),
    defq(0x002F, "jmpi_ne", "jmpi_!=", &[REG, I32, SCRIPT], V0_V4),
    defq(0x0030, "ujmp_gt", "ujmp_>", &[REG, REG, SCRIPT], V0_V4),
    defq(0x0031, "ujmpi_gt", "ujmpi_>", &[REG, I32, SCRIPT], V0_V4),
    defq(0x0032, "jmp_gt", "jmp_>", &[REG, REG, SCRIPT], V0_V4),
    defq(0x0033, "jmpi_gt", "jmpi_>", &[REG, I32, SCRIPT], V0_V4),
    defq(0x0034, "ujmp_lt", "ujmp_<", &[REG, REG, SCRIPT], V0_V4),
    defq(0x0035, "ujmpi_lt", "ujmpi_<", &[REG, I32, SCRIPT], V0_V4),
    defq(0x0036, "jmp_lt", "jmp_<", &[REG, REG, SCRIPT], V0_V4),
    defq(0x0037, "jmpi_lt", "jmpi_<", &[REG, I32, SCRIPT], V0_V4),
    defq(0x0038, "ujmp_ge", "ujmp_>=", &[REG, REG, SCRIPT], V0_V4),
    defq(0x0039, "ujmpi_ge", "ujmpi_>=", &[REG, I32, SCRIPT], V0_V4),
    defq(0x003A, "jmp_ge", "jmp_>=", &[REG, REG, SCRIPT], V0_V4),
    defq(0x003B, "jmpi_ge", "jmpi_>=", &[REG, I32, SCRIPT], V0_V4),
    defq(0x003C, "ujmp_le", "ujmp_<=", &[REG, REG, SCRIPT], V0_V4),
    defq(0x003D, "ujmpi_le", "ujmpi_<=", &[REG, I32, SCRIPT], V0_V4),
    defq(0x003E, "jmp_le", "jmp_<=", &[REG, REG, SCRIPT], V0_V4),
    defq(0x003F, "jmpi_le", "jmpi_<=", &[REG, I32, SCRIPT], V0_V4),
    def(0x0040, "switch_jmp", &[REG, SCRIPT_SET], V0_V4),
    def(0x0041, "switch_call", &[REG, SCRIPT_SET], V0_V4),

    // VM stack (V3 additions)
    def(0x0042, "stack_push", &[REG], V3_V4),
    def(0x0043, "stack_pop", &[REG], V3_V4),
    def(0x0044, "stack_pushm", &[REG, I32], V3_V4),
    def(0x0045, "stack_popm", &[REG, I32], V3_V4),

    // push-arg primitives for the V3 calling convention
    def(0x0048, "arg_pushr", &[REG], V3_V4 | F_PASS),
    def(0x0049, "arg_pushl", &[I32], V3_V4 | F_PASS),
    def(0x004A, "arg_pushw", &[I16], V3_V4 | F_PASS),
    def(0x004B, "arg_pushb", &[I8], V3_V4 | F_PASS),
    def(0x004C, "arg_pusha", &[REG], V3_V4 | F_PASS),
    def(0x004D, "arg_pusho", &[LABEL], V3_V4 | F_PASS),
    def(0x004E, "arg_pushs", &[STR], V3_V4 | F_PASS),

    // message windows
    def(0x0050, "window_msg", &[STR], V0_V4 | F_ARGS),
    def(0x0051, "add_msg", &[STR], V0_V4 | F_ARGS),
    def(0x0052, "mesend", &[], V0_V4),
    def(0x0053, "gettime", &[REG], V0_V4),
    def(0x0054, "winend", &[], V0_V4),

    // NPCs
    def(0x0056, "npc_crt", &[I8, I8], V0_V4 | F_ARGS),
    def(0x0057, "npc_stop", &[REG], V0_V4 | F_ARGS),
    def(0x0058, "npc_play", &[I32], V0_V4 | F_ARGS),
    def(0x0059, "npc_kill", &[REG], V0_V4 | F_ARGS),
    def(0x005A, "npc_nont", &[], V0_V4),
    def(0x005B, "npc_talk", &[], V0_V4),
    def(0x005C, "npc_crp", &[REG, PVIS], V0_V4),
    def(0x005E, "npc_param", &[PSTATS, I32], V1_V4 | F_ARGS),

    // player
    def(0x0060, "pl_add_meseta", &[I32, I32], V0_V4 | F_ARGS),
    def(0x0061, "pl_lose_meseta", &[I32], V1_V4 | F_ARGS),
    def(0x0062, "pl_get_meseta", &[REG], V1_V4 | F_ARGS),
    def(0x0063, "p_setpos", &[I32, MOVE], V0_V4 | F_ARGS),
    def(0x0064, "p_return_guild", &[], V0_V4),
    def(0x0065, "p_talk_guild", &[I32], V0_V4 | F_ARGS),
    def(0x0066, "p_dead", &[REG, I32], V0_V4 | F_ARGS),
    def(0x0067, "p_disablewarp", &[], V0_V4),
    def(0x0068, "p_enablewarp", &[], V0_V4),
    def(0x0069, "p_noncol", &[], V0_V4),
    def(0x006A, "p_col", &[], V0_V4),
    def(0x006B, "p_setv3", &[I32], V3_V4 | F_ARGS),
    def(0x006C, "p_look", &[I32], V0_V4 | F_ARGS),
    def(0x006D, "p_action_disable", &[], V1_V4),
    def(0x006E, "p_action_enable", &[], V1_V4),
    def(0x006F, "disable_movement1", &[I32], V0_V4 | F_ARGS),
    def(0x0070, "enable_movement1", &[I32], V0_V4 | F_ARGS),
    def(0x0071, "disable_movement2", &[I32], V1_V4 | F_ARGS),
    def(0x0072, "enable_movement2", &[I32], V1_V4 | F_ARGS),

    // camera and staging
    def(0x0074, "fadein", &[], V0_V4),
    def(0x0075, "fadeout", &[], V0_V4),
    def(0x0076, "se", &[I32], V0_V4 | F_ARGS),
    def(0x0077, "bgm", &[I32], V0_V4 | F_ARGS),
    def(0x0078, "enable", &[I32], V1_V4 | F_ARGS),
    def(0x0079, "disable", &[I32], V1_V4 | F_ARGS),
    def(0x007A, "window_time", &[I32], V0_V4 | F_ARGS),
    def(0x007B, "winset_time", &[], V0_V4),
    def(0x007C, "getmtime", &[REG], V0_V4),
    def(0x007D, "set_quest_board_handler", &[I32, SCRIPT, STR], V0_V4 | F_ARGS),
    def(0x007E, "clear_quest_board_handler", &[I32], V0_V4 | F_ARGS),

    // doors, switches, wave events
    def(0x0080, "set_switch_flag", &[I16], V0_V4 | F_ARGS),
    def(0x0081, "clear_switch_flag", &[I16], V0_V4 | F_ARGS),
    def(0x0082, "check_switch_flag", &[REG, I16], V0_V4 | F_ARGS),
    def(0x0083, "set_door_lock", &[I16], V0_V4 | F_ARGS),
    def(0x0084, "clear_door_lock", &[I16], V0_V4 | F_ARGS),
    def(0x0085, "start_setevt", &[I32, I32], V0_V4 | F_ARGS),
    def(0x0086, "warp_on", &[], V0_V4),
    def(0x0087, "warp_off", &[], V0_V4),

    def(0x0088, "get_slotnumber", &[REG], V0_V4),
    def(0x0089, "get_servernumber", &[REG], V1_V4),
    def(0x008A, "set_eventflag", &[I16, I8], V0_V2),
    def(0x008A, "set_eventflag", &[I32, I32], V3_V4 | F_ARGS),
    def(0x008B, "get_eventflag", &[REG, I32], V1_V4 | F_ARGS),
    def(0x008C, "res", &[REG], V0_V4 | F_ARGS),
    def(0x008D, "set_qt_failure", &[SCRIPT], V0_V4),
    def(0x008E, "set_qt_success", &[SCRIPT], V0_V4),
    def(0x008F, "set_qt_cancel", &[SCRIPT], V1_V4),

    // map and floor control
    def(0x0090, "set_floor", &[REG], V0_V4 | F_ARGS),
    def(0x0091, "set_mainwarp", &[I32], V0_V4 | F_ARGS),
    def(0x0092, "clear_mainwarp", &[I32], V1_V4 | F_ARGS),
    def(0x0093, "floor_camera", &[I32, SCRIPT], V1_V4 | F_ARGS),
    // the V1/V2 form takes an inline area list, V3 moved it to registers
    def(0x0094, "map_designate", &[I8, DATA], V0_V2),
    def(0x0094, "map_designate", &[REGS4], V3_V4),
    def(0x0095, "map_designate_ex", &[REGS5], V3_V4),
    def(0x0096, "warp", &[I32, I32], V0_V4 | F_ARGS),
    def(0x0097, "warpone", &[I32, I32, I32], V1_V4 | F_ARGS),

    // sound and effects
    def(0x0098, "playbgm_epi", &[I32], V2_V4 | F_ARGS),
    def(0x0099, "sound", &[I32, I32], V0_V4 | F_ARGS),
    def(0x009A, "particle", &[REGS3], V0_V4),
    def(0x009B, "particle2", &[REGS3, I32, F32], V2_V4 | F_ARGS),
    def(0x009C, "load_pvr", &[], V0_V2),
    def(0x009C, "load_pvr", &[IMAGE32], V3_V4),
    def(0x009D, "load_midi", &[DATA], V0_V2),

    // objects
    def(0x00A0, "obj_del", &[REG], V0_V4 | F_ARGS),
    def(0x00A1, "set_obj_param", &[DATA, REG], V0_V4),
    def(0x00A2, "obj_fade", &[REG, I32], V1_V4 | F_ARGS),
    def(0x00A3, "unset_obj_fade", &[REG], V1_V4 | F_ARGS),

    // chat
    def(0x00A8, "set_chat_callback", &[REG, CSTR], V0_V4),
    def(0x00A9, "clear_chat_callback", &[REG], V1_V4 | F_ARGS),
    // 0x00AA..0x00AF never shipped in any build

    def(0x00B0, "enable_bgmctrl", &[I32], V1_V4 | F_ARGS),
    def(0x00B1, "create_bgmctrl", &[], V1_V4),
    def(0x00B2, "sw_send", &[DATA], V0_V4),
    def(0x00B3, "sync_leti", &[REG, I32], V0_V4),
    defq(0x00B4, "sync_register", "sync_let", &[REG, I32], V1_V4 | F_ARGS),
    def(0x00B5, "send_regwork", &[REG, REG], V0_V2),

    // cutscene camera
    def(0x00C0, "leti_fixed_camera", &[REGS6], V2_V4),
    def(0x00C1, "default_camera_pos1", &[], V2_V4),
    def(0x00C2, "pcam_param", &[REG], V0_V4 | F_ARGS),
    def(0x00C3, "cam_zmin", &[I32], V1_V4 | F_ARGS),
    def(0x00C4, "cam_zmout", &[I32], V1_V4 | F_ARGS),
    def(0x00C5, "cam_pan", &[REGS5], V1_V4),
    def(0x00C6, "cam_quake", &[], V0_V4),
    def(0x00C7, "cam_adj", &[], V0_V4),

    // timers
    def(0x00D0, "window_time_set", &[I32], V0_V4 | F_ARGS),
    def(0x00D1, "timer_start", &[REG, I32], V1_V4 | F_ARGS),
    def(0x00D2, "timer_stop", &[REG], V1_V4 | F_ARGS),
    def(0x00D3, "timer_check", &[REG, REG], V1_V4 | F_ARGS),

    // item handling
    def(0x00E0, "item_create", &[REGS3, REG], V1_V4),
    def(0x00E1, "item_create2", &[REGS6, REG], V2_V4),
    def(0x00E2, "item_delete", &[REG, REGS3], V1_V4),
    def(0x00E3, "item_delete2", &[REGS3, REGS4], V2_V4),
    def(0x00E4, "item_check", &[REGS3, REG], V1_V4),
    def(0x00E5, "setevt", &[I32], V0_V4 | F_ARGS),
    def(0x00E6, "get_difficulty_level_v1", &[REG], V1_V4),
    def(0x00E7, "set_qt_exit", &[SCRIPT], V1_V4),

    // two-byte range, V2 additions
    defq(0xF800, "set_chat_censor", "chat_censor", &[I32], V2_V4 | F_ARGS),
    def(0xF801, "set_symbol_chat_collision", &[REGS3], V2_V4),
    def(0xF802, "set_shrink_size", &[REG, REGS2], V2_V4),
    def(0xF803, "death_tech_lvl_up", &[I32], V2_V4 | F_ARGS),
    def(0xF804, "death_item_drop", &[I32, I32], V2_V4 | F_ARGS),
    def(0xF805, "set_qt_meseta_drop", &[SCRIPT], V2_V4),
    def(0xF806, "enable_rare_drops", &[I32], V2_V4 | F_ARGS),
    def(0xF807, "cleared_menu_flags", &[I32], V2_V4 | F_ARGS),
    defq(0xF808, "get_difficulty_level_v2", "get_difflvl", &[REG], V2_V4),
    def(0xF809, "get_number_of_players", &[REG], V2_V4),
    def(0xF80A, "get_coord_of_player", &[REGS3, REG], V2_V4),
    def(0xF80B, "enable_map", &[], V2_V4),
    def(0xF80C, "disable_map", &[], V2_V4),
    def(0xF80D, "map_designate_v2", &[REGS5], V2_V4),
    def(0xF80E, "disable_weapon_drop", &[I32], V2_V4 | F_ARGS),
    def(0xF80F, "enable_weapon_drop", &[I32], V2_V4 | F_ARGS),
    def(0xF810, "ba_initial_floor", &[I32], V2_V4 | F_ARGS),
    def(0xF811, "set_ba_rules", &[], V2_V4),
    def(0xF812, "ba_set_tech", &[I32], V2_V4 | F_ARGS),
    def(0xF813, "ba_set_equip", &[I32], V2_V4 | F_ARGS),
    def(0xF814, "ba_set_mag", &[I32], V2_V4 | F_ARGS),
    def(0xF815, "ba_set_item", &[I32], V2_V4 | F_ARGS),
    def(0xF816, "ba_set_trapmenu", &[I32], V2_V4 | F_ARGS),
    def(0xF817, "ba_set_unused_F817", &[I32], V2_V4 | F_ARGS),
    def(0xF818, "ba_set_respawn", &[I32], V2_V4 | F_ARGS),
    def(0xF819, "ba_set_char", &[I32], V2_V4 | F_ARGS),
    def(0xF81A, "ba_dropwep", &[I32], V2_V4 | F_ARGS),
    def(0xF81B, "ba_teams", &[I32], V2_V4 | F_ARGS),
    def(0xF81C, "ba_disp_msg", &[STR], V2_V4 | F_ARGS),
    def(0xF81D, "death_lvl_up", &[I32], V2_V4 | F_ARGS),
    def(0xF81E, "ba_set_meseta", &[I32], V2_V4 | F_ARGS),
    def(0xF820, "cmode_stage", &[I32], V2_V4 | F_ARGS),
    def(0xF821, "nov_rank_data", &[RESIST, ATTACK], V2_V4),
    def(0xF822, "cmode_rank", &[I32, STR], V2_V4 | F_ARGS),
    def(0xF823, "award_item_name", &[], V2_V4),
    def(0xF824, "award_item_select", &[], V2_V4),
    def(0xF825, "award_item_give_to", &[REG], V2_V4),
    def(0xF826, "set_cmode_rank_result", &[REG, REG], V2_V4),
    def(0xF827, "check_rank_time", &[REG, REG], V2_V4),
    def(0xF828, "item_create_cmode", &[REGS3, REG], V2_V4),
    def(0xF829, "ba_box_drops", &[REG], V2_V4),
    def(0xF82A, "award_item_total", &[REG], V2_V4),
    def(0xF82B, "obj_particle_set", &[REGS4, DATA], V2_V4),
    def(0xF82C, "set_enemy_movement", &[REG, MOVE], V2_V4),
    def(0xF82D, "set_enemy_resist", &[REG, RESIST], V2_V4),
    def(0xF82E, "set_enemy_attack", &[REG, ATTACK], V2_V4),
    def(0xF830, "cmode_rank_result", &[I32], V2_V4 | F_ARGS),
    def(0xF831, "open_time_select_menu", &[REG], V2_V4),
    def(0xF832, "time_select_result", &[REG], V2_V4),
    def(0xF833, "set_quake_intensity", &[F32, F32], V2_V4),
    def(0xF834, "set_wind_velocity", &[F32, F32, F32], V2_V4),
    def(0xF835, "fog_switch", &[I32], V2_V4 | F_ARGS),
    def(0xF836, "counter_window", &[I32, STR], V2_V4 | F_ARGS),

    def(0xF840, "load_enemy_data", &[I32], V2_V4 | F_ARGS),
    def(0xF841, "get_physical_data", &[PSTATS], V2_V4),
    def(0xF842, "get_attack_data", &[ATTACK], V2_V4),
    def(0xF843, "get_resist_data", &[RESIST], V2_V4),
    def(0xF844, "get_movement_data", &[MOVE], V2_V4),
    def(0xF848, "shift_left", &[REG, REG], V2_V4),
    def(0xF849, "shift_right", &[REG, REG], V2_V4),
    def(0xF84A, "get_random", &[REGS2, REG], V2_V4),
    def(0xF84B, "reset_map", &[], V2_V4),
    def(0xF84C, "disp_chl_retry_menu", &[REG], V2_V4),
    def(0xF84D, "chl_set_timerecord", &[REG], V2_V4),
    def(0xF84E, "chl_get_timerecord", &[REG], V2_V4),
    def(0xF84F, "set_cmode_grave_rates", &[REGS4, DATA], V2_V4),

    def(0xF850, "message", &[I32, STR], V0_V4 | F_ARGS),
    def(0xF851, "list", &[REG, STR], V1_V4 | F_ARGS),
    def(0xF852, "fadein2", &[], V1_V4),
    def(0xF853, "fadeout2", &[], V1_V4),
    def(0xF854, "clear_smemo", &[I32], V2_V4 | F_ARGS),
    def(0xF855, "chl_recovery", &[I32], V2_V4 | F_ARGS),
    def(0xF856, "unknown_F856", &[], V2_V4),
    def(0xF857, "unknown_F857", &[], V2_V4),

    // V3 additions
    def(0xF860, "unknown_F860", &[], V3_V4),
    def(0xF861, "read_guildcard_flag", &[REG, REG], V3_V4),
    def(0xF862, "unknown_F862", &[REG], V3_V4),
    def(0xF863, "open_pack_select", &[REG], V3_V4),
    def(0xF864, "item_select", &[REG], V3_V4),
    def(0xF865, "get_item_id", &[REG], V3_V4),
    def(0xF866, "color_change", &[I32, I32, I32, I32, I32], V3_V4 | F_ARGS),
    def(0xF867, "send_statistic", &[I32, I32, I32, I32, I32, I32, I32, I32], V3_V4 | F_ARGS),
    def(0xF868, "unknown_F868", &[REG, REG], V3_V4),
    def(0xF869, "chat_box", &[I32, I32, I32, I32, I32, STR], V3_V4 | F_ARGS),
    def(0xF86A, "chat_bubble", &[I32, STR], V3_V4 | F_ARGS),
    def(0xF86C, "scroll_text", &[I32, I32, I32, I32, I32, F32, REG, STR], V3_V4 | F_ARGS),
    def(0xF86D, "gba_unknown1", &[], V3_V4),
    def(0xF86E, "gba_unknown2", &[REG], V3_V4),
    def(0xF86F, "gba_unknown3", &[REG], V3_V4),
    def(0xF870, "gba_unknown4", &[], V3_V4),
    def(0xF871, "get_gc_number", &[REG], V3_V4),
    def(0xF872, "unknown_F872", &[], V3_V4),
    def(0xF873, "get_wrap_status", &[REG], V3_V4),
    def(0xF874, "initial_floor", &[I32], V3_V4 | F_ARGS),
    def(0xF875, "sin", &[REG, I32], V3_V4 | F_ARGS),
    def(0xF876, "cos", &[REG, I32], V3_V4 | F_ARGS),
    def(0xF877, "tan", &[REG, I32], V3_V4 | F_ARGS),
    defq(0xF878, "atan2_int", "atan", &[REG, F32, F32], V3_V4 | F_ARGS),
    def(0xF879, "olga_flow_is_dead", &[REG], V3_V4),
    def(0xF87A, "particle3", &[REGS5], V3_V4),
    def(0xF87B, "npc_text", &[I32, STR], V3_V4 | F_ARGS),
    def(0xF87C, "npc_chkwarp", &[], V3_V4),
    def(0xF87D, "pl_pkoff", &[], V3_V4),
    def(0xF87E, "map_designate_v3", &[REGS4], V3_V4),
    def(0xF87F, "masterkey_on", &[], V3_V4),
    def(0xF880, "masterkey_off", &[], V3_V4),
    def(0xF881, "window_time_disp", &[], V3_V4),
    def(0xF882, "winclose", &[], V3_V4),
    def(0xF883, "return_to_lobby", &[I32, I32], V3_V4 | F_ARGS),
    def(0xF884, "set_quest_number", &[I32], V3_V4 | F_ARGS),
    def(0xF885, "unknown_F885", &[REG], V3_V4),
    def(0xF886, "unknown_F886", &[REG], V3_V4),
    def(0xF887, "unknown_F887", &[REG], V3_V4),
    def(0xF888, "unknown_F888", &[I32, I32], V3_V4 | F_ARGS),
    def(0xF889, "unknown_F889", &[], V3_V4),
    def(0xF88A, "get_pl_status", &[REG], V3_V4),
    def(0xF88B, "is_dead", &[REG, REG], V3_V4),
    def(0xF88C, "get_sid", &[REG], V3_V4),
    def(0xF88D, "epilogue_text", &[I32], V3_V4 | F_ARGS),
    def(0xF88E, "unknown_F88E", &[REG], V3_V4),
    def(0xF88F, "give_s_rank_weapon", &[I32, I32, STR], V3_V4 | F_ARGS),
    def(0xF890, "get_mag_levels", &[REGS4], V3_V4),
    def(0xF891, "unknown_F891", &[REGS4, DATA], V3_V4),
    def(0xF892, "unknown_F892", &[REG], V3_V4),
    def(0xF893, "unknown_F893", &[I32], V3_V4 | F_ARGS),
    def(0xF894, "set_trap_damage", &[REGS2], V3_V4),
    def(0xF895, "unknown_F895", &[I32], V3_V4 | F_ARGS),
    def(0xF896, "set_lobby_event", &[I32], V3_V4 | F_ARGS),
    def(0xF898, "get_team_points", &[REG], V3_V4),
    def(0xF89A, "scroll_stop", &[], V3_V4),
    def(0xF89B, "get_area_number", &[REG], V3_V4),

    def(0xF8A0, "dragon_act", &[REGS3], V3_V4),
    def(0xF8A1, "pad_dragon", &[], V3_V4),
    def(0xF8A2, "set_gravity", &[F32, F32, F32], V3_V4),
    def(0xF8A3, "play_se_radius", &[I32, F32, REGS3], V3_V4),
    def(0xF8A4, "boss_gate", &[I32, I32], V3_V4 | F_ARGS),
    def(0xF8A5, "boss_stop", &[], V3_V4),
    def(0xF8A6, "camera_shake", &[F32, F32], V3_V4),
    def(0xF8A8, "rain_switch", &[I32], V3_V4 | F_ARGS),
    def(0xF8A9, "unknown_F8A9", &[REG], V3_V4),
    def(0xF8AD, "get_cmode_stage", &[REG], V3_V4),

    def(0xF8B8, "disable_chl_retry", &[], V3_V4),
    def(0xF8B9, "chl_is_retry", &[REG], V3_V4),
    def(0xF8BA, "load_guild_flag", &[REG], V3_V4),
    def(0xF8BB, "write_guild_flag", &[REG, REG], V3_V4),
    def(0xF8BC, "set_episode", &[I32], V3_V4 | F_ARGS | F_SET_EPISODE),
    def(0xF8C0, "file_dl_req", &[I32, STR], V3_V4 | F_ARGS),
    def(0xF8C1, "get_dl_status", &[REG], V3_V4),
    def(0xF8C2, "gba_unknown5", &[], V3_V4),
    def(0xF8C3, "get_gba_status", &[REG], V3_V4),
    def(0xF8C4, "congrats_msg", &[I32, STR], V3_V4 | F_ARGS),
    def(0xF8C5, "stage_end_text", &[I32, STR], V3_V4 | F_ARGS),
    def(0xF8C6, "exit_game", &[], V3_V4),
    def(0xF8C7, "send_regwork_v3", &[REG, REG], V3_V4),
    def(0xF8C8, "check_ep2_on_lobby", &[REG], V3_V4),
    def(0xF8C9, "unknown_F8C9", &[REG], V3_V4),
    def(0xF8CA, "sync_register2", &[REG, I32], V3_V4 | F_ARGS),

    def(0xF8D0, "belt_on", &[], V3_V4),
    def(0xF8D1, "belt_off", &[], V3_V4),
    def(0xF8D2, "get_belt_level", &[REG], V3_V4),
    def(0xF8D3, "unknown_F8D3", &[REG, I32], V3_V4 | F_ARGS),
    def(0xF8D4, "sound_volume", &[F32], V3_V4),
    def(0xF8D5, "unknown_F8D5", &[REG], V3_V4),
    def(0xF8D6, "clear_score", &[], V3_V4),
    def(0xF8D7, "add_score", &[REG], V3_V4),
    def(0xF8D8, "window_pos", &[F32, F32], V3_V4),
    def(0xF8D9, "window_size", &[F32, F32], V3_V4),

    def(0xF8E0, "read1", &[REG, REG], V3_V4),
    def(0xF8E1, "read2", &[REG, REG], V3_V4),
    def(0xF8E2, "read4", &[REG, REG], V3_V4),
    def(0xF8E3, "write1", &[REG, REG], V3_V4),
    def(0xF8E4, "write2", &[REG, REG], V3_V4),
    def(0xF8E5, "write4", &[REG, REG], V3_V4),
    def(0xF8E6, "check_for_keyword", &[REG, STR], V3_V4 | F_ARGS),
    def(0xF8E7, "get_guildcard_num", &[REG], V3_V4),
    def(0xF8E8, "get_pl_name", &[REG], V3_V4),
    def(0xF8E9, "get_pl_job", &[REG], V3_V4),
    def(0xF8EA, "get_player_proximity", &[REG, REG], V3_V4),

    def(0xF8F0, "load_image", &[IMAGE32], V3_V4),
    def(0xF8F1, "show_image", &[I32], V3_V4 | F_ARGS),
    def(0xF8F2, "unknown_F8F2", &[F8F2DATA32], V3_V4),
    def(0xF8F3, "unknown_F8F3", &[REGS2], V3_V4),

    // float helpers (late V3)
    def(0xF901, "dec2float", &[REG, REG], V3_V4),
    def(0xF902, "float2dec", &[REG, REG], V3_V4),
    def(0xF903, "flet", &[REG, REG], V3_V4),
    def(0xF904, "fleti", &[REG, F32], V3_V4),
    def(0xF908, "fadd", &[REG, REG], V3_V4),
    def(0xF909, "faddi", &[REG, F32], V3_V4),
    def(0xF90A, "fsub", &[REG, REG], V3_V4),
    def(0xF90B, "fsubi", &[REG, F32], V3_V4),
    def(0xF90C, "fmul", &[REG, REG], V3_V4),
    def(0xF90D, "fmuli", &[REG, F32], V3_V4),
    def(0xF90E, "fdiv", &[REG, REG], V3_V4),
    def(0xF90F, "fdivi", &[REG, F32], V3_V4),
    def(0xF910, "get_total_deaths", &[REG], V3_V4),
    defq(0xF911, "fjmp_eq", "fjmp_=", &[REG, REG, SCRIPT], V3_V4),
    defq(0xF912, "fjmpi_eq", "fjmpi_=", &[REG, F32, SCRIPT], V3_V4),
    defq(0xF913, "fjmp_gt", "fjmp_>", &[REG, REG, SCRIPT], V3_V4),
    defq(0xF914, "fjmpi_gt", "fjmpi_>", &[REG, F32, SCRIPT], V3_V4),
    defq(0xF915, "fjmp_lt", "fjmp_<", &[REG, REG, SCRIPT], V3_V4),
    defq(0xF916, "fjmpi_lt", "fjmpi_<", &[REG, F32, SCRIPT], V3_V4),

    // BB additions
    def(0xF920, "BB_set_lobby_mode", &[I32], V4_ONLY | F_ARGS),
    def(0xF921, "BB_get_lobby_mode", &[REG], V4_ONLY),
    def(0xF922, "BB_unknown_F922", &[REG32], V4_ONLY),
    def(0xF923, "BB_unknown_F923", &[REG32, I32], V4_ONLY | F_ARGS),
    def(0xF924, "BB_unknown_F924", &[REG32S3], V4_ONLY),
    def(0xF925, "BB_unknown_F925", &[REG32S4], V4_ONLY),

    def(0xF940, "BB_item_pack_init", &[], V4_ONLY),
    def(0xF941, "BB_get_number_in_pack", &[REG], V4_ONLY),
    def(0xF948, "BB_death_tech_lvl_up2", &[I32], V4_ONLY | F_ARGS),
    def(0xF949, "BB_is_server_time", &[REG], V4_ONLY),
    def(0xF950, "BB_p2_menu", &[I32], V4_ONLY | F_ARGS),
    def(0xF951, "BB_map_designate", &[I16, I16, I8, I8], V4_ONLY),
    def(0xF952, "BB_get_number_in_bank", &[REG], V4_ONLY),
    def(0xF953, "BB_swap_item", &[I32, I32, I32, I32, I32, I32, SCRIPT, SCRIPT], V4_ONLY | F_ARGS),
    def(0xF954, "BB_check_wrap", &[REG, REG], V4_ONLY),
    def(0xF955, "BB_exchange_PD_item", &[REG, REG, REG, SCRIPT, SCRIPT], V4_ONLY | F_ARGS),
    def(0xF956, "BB_exchange_PD_srank", &[REG, REG, REG, REG, REG, SCRIPT, SCRIPT], V4_ONLY | F_ARGS),
    def(0xF957, "BB_exchange_PD_special", &[REG, REG, REG, REG, REG, I32, SCRIPT, SCRIPT], V4_ONLY | F_ARGS),
    def(0xF958, "BB_exchange_PD_percent", &[REG, REG, REG, REG, REG, I32, SCRIPT, SCRIPT], V4_ONLY | F_ARGS),
    def(0xF959, "BB_unknown_F959", &[I32], V4_ONLY | F_ARGS),
    def(0xF95C, "BB_exchange_slot_item", &[REG, REG, REG, REG, SCRIPT, SCRIPT], V4_ONLY | F_ARGS),
    def(0xF95D, "BB_exchange_PC", &[], V4_ONLY),
    def(0xF95E, "BB_box_create_BP", &[I32, F32, F32], V4_ONLY | F_ARGS),
    def(0xF95F, "BB_exchange_PT", &[REG, REG, I32, SCRIPT, SCRIPT], V4_ONLY | F_ARGS),
    def(0xF960, "BB_unknown_F960", &[I32], V4_ONLY | F_ARGS),
    def(0xF961, "BB_unknown_F961", &[REG], V4_ONLY),
];
