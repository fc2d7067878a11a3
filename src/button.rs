//! Button synthesis.
//! Every stratagem button is a StreamDock "Multi Action": a ctrl lift, one hotkey per direction
//! in the sequence, then a ctrl press. The ctrl pair brackets the sequence so the game sees the
//! stratagem menu held open while the directions are typed.
//!
//! Field names, nesting and the literal values below are read by the StreamDock host as-is.

use serde::Serialize;

use crate::keymap::{self, VK_NONE};
use crate::stratagem::Stratagem;
use crate::token;

pub const HOTKEY_UUID: &str = "com.hotspot.streamdock.system.hotkey";
pub const MULTI_ACTION_UUID: &str = "com.hotspot.streamdock.multiactions.routine";

const HOTKEY_IMAGE: &str = "Images/btn_custom_trigger_hotkey";
const MULTI_ACTION_IMAGE: &str = "Images/btn_multiAction";
const KEY_MODIFIERS: u32 = 65536;
const KEY_DELAY: u32 = 20;
const FONT_SIZE: u32 = 8;

/// One of the three key-event slots in a hotkey action.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KeySlot {
    #[serde(rename = "KeyCmd")]
    pub key_cmd: bool,
    #[serde(rename = "KeyCtrl")]
    pub key_ctrl: bool,
    #[serde(rename = "KeyModifiers")]
    pub key_modifiers: u32,
    #[serde(rename = "KeyOption")]
    pub key_option: bool,
    #[serde(rename = "KeyShift")]
    pub key_shift: bool,
    #[serde(rename = "NativeCode")]
    pub native_code: i32,
    #[serde(rename = "QTKeyCode")]
    pub qt_key_code: i32,
    #[serde(rename = "RKeyCmd")]
    pub r_key_cmd: bool,
    #[serde(rename = "RKeyCtrl")]
    pub r_key_ctrl: bool,
    #[serde(rename = "RKeyOption")]
    pub r_key_option: bool,
    #[serde(rename = "RKeyShift")]
    pub r_key_shift: bool,
    /// Omitted for symbols with no keycode.
    #[serde(rename = "VKeyCode", skip_serializing_if = "Option::is_none")]
    pub v_key_code: Option<i32>,
}

impl KeySlot {
    fn new(ctrl: bool, v_key_code: Option<i32>) -> Self {
        KeySlot {
            key_cmd: false,
            key_ctrl: ctrl,
            key_modifiers: KEY_MODIFIERS,
            key_option: false,
            key_shift: false,
            native_code: VK_NONE,
            qt_key_code: VK_NONE,
            r_key_cmd: false,
            r_key_ctrl: false,
            r_key_option: false,
            r_key_shift: false,
            v_key_code,
        }
    }

    fn idle() -> Self {
        Self::new(false, Some(VK_NONE))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HotkeySettings {
    #[serde(rename = "Coalesce")]
    pub coalesce: bool,
    #[serde(rename = "Hotkeys")]
    pub hotkeys: [KeySlot; 3],
    pub delay: u32,
    #[serde(rename = "executionTimes")]
    pub execution_times: u32,
    #[serde(rename = "hotkeyRadioButtonIndex")]
    pub hotkey_radio_button_index: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActionState {
    #[serde(rename = "FontSize", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(rename = "Image")]
    pub image: String,
    #[serde(rename = "ShowTitle", skip_serializing_if = "Option::is_none")]
    pub show_title: Option<bool>,
    #[serde(rename = "Title")]
    pub title: String,
}

impl ActionState {
    /// Small-font state with the title hidden; the image is the label.
    fn captioned(image: impl Into<String>, title: impl Into<String>) -> Self {
        ActionState {
            font_size: Some(FONT_SIZE),
            image: image.into(),
            show_title: Some(false),
            title: title.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HotkeyAction {
    #[serde(rename = "ActionID")]
    pub action_id: String,
    #[serde(rename = "Controller")]
    pub controller: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Settings")]
    pub settings: HotkeySettings,
    #[serde(rename = "State")]
    pub state: u32,
    #[serde(rename = "States")]
    pub states: Vec<ActionState>,
    #[serde(rename = "UUID")]
    pub uuid: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CycleSettings {
    #[serde(rename = "cycleDelay")]
    pub cycle_delay: u32,
    #[serde(rename = "cycleMode")]
    pub cycle_mode: u32,
    #[serde(rename = "cycleNumber")]
    pub cycle_number: u32,
    #[serde(rename = "enablingCycle")]
    pub enabling_cycle: u32,
}

impl Default for CycleSettings {
    fn default() -> Self {
        CycleSettings {
            cycle_delay: 100,
            cycle_mode: 0,
            cycle_number: 1,
            enabling_cycle: 0,
        }
    }
}

/// The button as stored under its grid position in `Actions`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MultiAction {
    #[serde(rename = "ActionID")]
    pub action_id: String,
    #[serde(rename = "Actions")]
    pub actions: Vec<HotkeyAction>,
    #[serde(rename = "Controller")]
    pub controller: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Settings")]
    pub settings: CycleSettings,
    #[serde(rename = "State")]
    pub state: u32,
    #[serde(rename = "States")]
    pub states: Vec<ActionState>,
    #[serde(rename = "UUID")]
    pub uuid: String,
}

/// Which hotkey to build. Lift and press share the ctrl-held first slot and differ only in
/// title and radio index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hotkey {
    CtrlLift,
    Key(char),
    CtrlPress,
}

impl Hotkey {
    fn radio_index(self) -> u32 {
        match self {
            Hotkey::CtrlLift => 3,
            Hotkey::Key(_) => 0,
            Hotkey::CtrlPress => 2,
        }
    }
}

/// Builds one hotkey sub-action. Only the first slot carries anything; slots two and three
/// are always idle.
pub fn hotkey_action(hotkey: Hotkey) -> HotkeyAction {
    let (first, delay, state) = match hotkey {
        Hotkey::CtrlLift => (
            KeySlot::new(true, Some(VK_NONE)),
            0,
            ActionState::captioned(HOTKEY_IMAGE, "ctrl lift"),
        ),
        Hotkey::CtrlPress => (
            KeySlot::new(true, Some(VK_NONE)),
            0,
            ActionState::captioned(HOTKEY_IMAGE, "ctrl press"),
        ),
        Hotkey::Key(symbol) => {
            let code = keymap::key_code(symbol);
            if code.is_none() {
                tracing::warn!("No keycode for symbol '{}', emitting hotkey without VKeyCode", symbol);
            }
            (
                KeySlot::new(false, code),
                KEY_DELAY,
                ActionState {
                    font_size: None,
                    image: HOTKEY_IMAGE.to_string(),
                    show_title: None,
                    title: symbol.to_string(),
                },
            )
        }
    };

    HotkeyAction {
        action_id: token::action_id(),
        controller: String::new(),
        name: "Hotkey".to_string(),
        settings: HotkeySettings {
            coalesce: true,
            hotkeys: [first, KeySlot::idle(), KeySlot::idle()],
            delay,
            execution_times: 1,
            hotkey_radio_button_index: hotkey.radio_index(),
        },
        state: 0,
        states: vec![state],
        uuid: HOTKEY_UUID.to_string(),
    }
}

/// The full multi action for one stratagem. `image` is the copied icon's basename.
pub fn stratagem_button(stratagem: &Stratagem, image: Option<&str>) -> MultiAction {
    let mut actions = Vec::with_capacity(stratagem.sequence.len() + 2);
    actions.push(hotkey_action(Hotkey::CtrlLift));
    actions.extend(stratagem.symbols().map(|c| hotkey_action(Hotkey::Key(c))));
    actions.push(hotkey_action(Hotkey::CtrlPress));

    MultiAction {
        action_id: token::action_id(),
        actions,
        controller: "Keypad".to_string(),
        name: "Multi Action".to_string(),
        settings: CycleSettings::default(),
        state: 0,
        states: vec![ActionState::captioned(
            image.unwrap_or(MULTI_ACTION_IMAGE),
            stratagem.name.clone(),
        )],
        uuid: MULTI_ACTION_UUID.to_string(),
    }
}
