//! Global operation table
//!
//!     Every global operation has a canonical name, an emission category and one or more
//!     accepted argument shapes. The table is static data; the `operations!` macro below
//!     expands it into both the [`OPERATIONS`] slice and one chaining method per entry on
//!     [`Script`], so adding an operation is a one-line change.
//!
//! Emission
//!
//!     - Function:  `Name(arg1, arg2)`, text arguments double-quoted, no newline.
//!     - Command:   `Name` or `Name, arg1, arg2`, followed by a newline.
//!     - Directive: as Command, with the name prefixed by `#`.
//!
//!     Generated methods for functions append a separate newline fragment after the call,
//!     so a function used as a statement ends its line like any command.

use super::args::{check_shapes, Arg, IntoArgs, Param};
use super::builder::Script;
use super::error::Result;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// How an operation is written into the script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmissionCategory {
    Function,
    Command,
    Directive,
}

impl fmt::Display for EmissionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EmissionCategory::Function => "function",
            EmissionCategory::Command => "command",
            EmissionCategory::Directive => "directive",
        };
        f.write_str(label)
    }
}

/// One entry of the global operation table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Operation {
    /// Canonical AutoHotkey name
    pub name: &'static str,
    /// Name of the generated method on [`Script`]
    pub method: &'static str,
    pub category: EmissionCategory,
    /// Accepted argument shapes; a call must match at least one
    pub shapes: &'static [&'static [Param]],
}

impl Operation {
    /// Validate `args` against this operation's shapes
    pub fn check(&self, args: &[Arg]) -> Result<()> {
        check_shapes(self.name, self.shapes, args)
    }

    /// Render a call of this operation (without validation)
    pub fn emit(&self, args: &[Arg]) -> String {
        emit(self.category, self.name, args)
    }

    pub fn is_nullary(&self) -> bool {
        self.shapes.iter().all(|shape| shape.is_empty())
    }
}

/// Render `name` with `args` according to `category`
pub fn emit(category: EmissionCategory, name: &str, args: &[Arg]) -> String {
    match category {
        EmissionCategory::Function => emit_function(name, args),
        EmissionCategory::Command => emit_command(name, args),
        EmissionCategory::Directive => emit_command(&format!("#{name}"), args),
    }
}

fn emit_function(name: &str, args: &[Arg]) -> String {
    let args: Vec<String> = args.iter().map(Arg::to_function_arg).collect();
    format!("{}({})", name, args.join(", "))
}

fn emit_command(name: &str, args: &[Arg]) -> String {
    let mut line = name.to_string();
    for arg in args {
        line.push_str(", ");
        line.push_str(&arg.to_string());
    }
    line.push('\n');
    line
}

const WIN_CRITERIA: &[&str] = &["ahk_class", "ahk_exe", "ahk_id", "ahk_pid"];
const SINGLE_INSTANCE_MODES: &[&str] = &["Force", "Ignore", "Off"];
const ON_OFF: &[&str] = &["On", "Off"];
const SEND_MODES: &[&str] = &["Event", "Input", "Play", "InputThenPlay"];
const SUSPEND_MODES: &[&str] = &["On", "Off", "Toggle", "Permit"];
const KEY_STATE_MODES: &[&str] = &["P", "T"];

macro_rules! operations {
    (@shapes) => {
        &[&[]]
    };
    (@shapes $( [ $( $param:expr ),* ] )|+) => {
        &[ $( &[ $( $param ),* ] ),+ ]
    };
    (@method $(#[$meta:meta])* $name:ident $method:ident) => {
        $(#[$meta])*
        pub fn $method(&mut self) -> Result<&mut Self> {
            self.invoke(stringify!($name), ())
        }
    };
    (@method $(#[$meta:meta])* $name:ident $method:ident $($shapes:tt)+) => {
        $(#[$meta])*
        pub fn $method(&mut self, args: impl IntoArgs) -> Result<&mut Self> {
            self.invoke(stringify!($name), args)
        }
    };
    (
        $(
            $(#[$meta:meta])*
            $category:ident $name:ident => $method:ident $( ( $( [ $( $param:expr ),* ] )|+ ) )? ;
        )*
    ) => {
        /// Every operation known to the builder, in declaration order
        pub static OPERATIONS: &[Operation] = &[
            $(
                Operation {
                    name: stringify!($name),
                    method: stringify!($method),
                    category: EmissionCategory::$category,
                    shapes: operations!(@shapes $( $( [ $( $param ),* ] )|+ )?),
                },
            )*
        ];

        impl Script {
            $(
                operations!(@method $(#[$meta])* $name $method $( $( [ $( $param ),* ] )|+ )?);
            )*
        }
    };
}

operations! {
    /// `#IfWinActive`: make following hotkeys context sensitive; no arguments ends the context
    Directive IfWinActive => if_win_active (
        [Param::OneOf(WIN_CRITERIA), Param::Text] | [Param::Text] | []
    );
    Directive IfWinExist => if_win_exist (
        [Param::OneOf(WIN_CRITERIA), Param::Text] | [Param::Text] | []
    );
    /// `#Persistent`: keep the script running after the auto-execute section
    Directive Persistent => persistent;
    Directive SingleInstance => single_instance ([] | [Param::OneOf(SINGLE_INSTANCE_MODES)]);
    Directive InstallKeybdHook => install_keybd_hook;
    Directive InstallMouseHook => install_mouse_hook;
    Directive MaxThreadsPerHotkey => max_threads_per_hotkey ([Param::Number]);
    /// Hotkey presses allowed per interval before a warning dialog appears
    Directive MaxHotkeysPerInterval => max_hotkeys_per_interval ([Param::Number]);
    Directive NoEnv => no_env;
    Directive UseHook => use_hook ([] | [Param::OneOf(ON_OFF)]);

    Command SetBatchLines => set_batch_lines ([Param::Text] | [Param::Number]);
    Command SendMode => send_mode ([Param::OneOf(SEND_MODES)]);
    /// Delay and press duration, in milliseconds
    Command SetKeyDelay => set_key_delay ([Param::Number] | [Param::Number, Param::Number]);
    Command Send => send ([Param::Text]);
    Command SendInput => send_input ([Param::Text]);
    Command SendRaw => send_raw ([Param::Text]);
    Command SendEvent => send_event ([Param::Text]);
    Command SendPlay => send_play ([Param::Text]);
    Command Sleep => sleep ([Param::Number]);
    /// Frequency and duration; both optional
    Command SoundBeep => sound_beep ([] | [Param::Number] | [Param::Number, Param::Number]);
    Command Reload => reload;
    Command Suspend => suspend ([] | [Param::OneOf(SUSPEND_MODES)]);
    Command Exit => exit ([] | [Param::Number]);
    Command ExitApp => exit_app ([] | [Param::Number]);
    Command Run => run ([Param::Text]);
    Command MsgBox => msg_box ([Param::Text]);

    /// Physical (`P`) or toggle (`T`) state of a key
    Function GetKeyState => get_key_state ([Param::Text] | [Param::Text, Param::OneOf(KEY_STATE_MODES)]);
}

static OPERATION_INDEX: Lazy<HashMap<&'static str, &'static Operation>> =
    Lazy::new(|| OPERATIONS.iter().map(|op| (op.name, op)).collect());

/// Find an operation by canonical name
pub fn lookup(name: &str) -> Option<&'static Operation> {
    OPERATION_INDEX.get(name).copied()
}
