//! Built-in semantic tags.
//!
//! Each entry is a name and the style codes it renders as, in order. Entries
//! for application roles start with `-` so they never inherit attributes
//! from surrounding text.

/// (name, codes) pairs registered at startup.
pub const BUILTIN_TAGS: &[(&str, &[&str])] = &[
    // Attributes
    ("reset", &["-"]),
    ("nc", &["-"]),
    ("bold", &["::B"]),
    ("bd", &["::B"]),
    ("dim", &["::D"]),
    ("dm", &["::D"]),
    ("underline", &["::U"]),
    ("ul", &["::U"]),
    ("blink", &["::L"]),
    ("bl", &["::L"]),
    ("reverse", &["::R"]),
    ("rv", &["::R"]),
    ("italic", &["::I"]),
    ("it", &["::I"]),
    ("strike", &["::S"]),
    ("st", &["::S"]),
    // Foreground colors
    ("black", &["black"]),
    ("red", &["red"]),
    ("green", &["green"]),
    ("yellow", &["yellow"]),
    ("blue", &["blue"]),
    ("magenta", &["magenta"]),
    ("cyan", &["cyan"]),
    ("white", &["white"]),
    ("k", &["black"]),
    ("r", &["red"]),
    ("g", &["green"]),
    ("y", &["yellow"]),
    ("b", &["blue"]),
    ("m", &["magenta"]),
    ("c", &["cyan"]),
    ("w", &["white"]),
    ("f_black", &["black"]),
    ("f_red", &["red"]),
    ("f_green", &["green"]),
    ("f_yellow", &["yellow"]),
    ("f_blue", &["blue"]),
    ("f_magenta", &["magenta"]),
    ("f_cyan", &["cyan"]),
    ("f_white", &["white"]),
    // Background colors
    ("blackbg", &[":black"]),
    ("redbg", &[":red"]),
    ("greenbg", &[":green"]),
    ("yellowbg", &[":yellow"]),
    ("bluebg", &[":blue"]),
    ("magentabg", &[":magenta"]),
    ("cyanbg", &[":cyan"]),
    ("whitebg", &[":white"]),
    ("b_black", &[":black"]),
    ("b_red", &[":red"]),
    ("b_green", &[":green"]),
    ("b_yellow", &[":yellow"]),
    ("b_blue", &[":blue"]),
    ("b_magenta", &[":magenta"]),
    ("b_cyan", &[":cyan"]),
    ("b_white", &[":white"]),
    // Log levels
    ("timestamp", &["-"]),
    ("trace", &["-", "blue"]),
    ("debug", &["-", "blue"]),
    ("info", &["-", "blue"]),
    ("notice", &["-", "green"]),
    ("warn", &["-", "yellow"]),
    ("error", &["-", "red"]),
    ("fatal", &["-", "white:red"]),
    ("fatalfooter", &["-"]),
    ("traceheader", &["-", "red"]),
    ("tracefooter", &["-", "red"]),
    ("traceframenumber", &["-", "red"]),
    ("traceframelines", &["-", "red"]),
    ("tracesourcefile", &["-", "cyan::B"]),
    ("tracelinenumber", &["-", "yellow::B"]),
    ("tracefunction", &["-", "green::B"]),
    ("tracecmd", &["-", "green::B"]),
    ("tracecmdargs", &["-", "green"]),
    ("unittestpass", &["-", "green"]),
    ("unittestfail", &["-", "red"]),
    ("unittestfailarrow", &["-", "red"]),
    // Application roles
    ("app", &["-", "cyan"]),
    ("applicationname", &["-", "cyan::B"]),
    ("branch", &["-", "cyan"]),
    ("failingcommand", &["-", "red"]),
    ("file", &["-", "cyan::B"]),
    ("folder", &["-", "cyan::B"]),
    ("program", &["-", "cyan"]),
    ("runningcommand", &["-", "green::B"]),
    ("theme", &["-", "cyan"]),
    ("update", &["-", "green"]),
    ("user", &["-", "cyan"]),
    ("url", &["-", "cyan::U"]),
    ("usercommand", &["-", "yellow::B"]),
    ("usercommanderror", &["-", "red::U"]),
    ("usercommanderrormarker", &["-", "red"]),
    ("var", &["-", "magenta"]),
    ("version", &["-", "cyan"]),
    ("yes", &["-", "green"]),
    ("no", &["-", "red"]),
    // Usage text
    ("usagecommand", &["-", "yellow::B"]),
    ("usageoption", &["-", "yellow"]),
    ("usageapp", &["-", "cyan"]),
    ("usagebranch", &["-", "cyan"]),
    ("usagefile", &["-", "cyan::B"]),
    ("usagepage", &["-", "cyan::B"]),
    ("usagetheme", &["-", "cyan"]),
    ("usagevar", &["-", "magenta"]),
];
