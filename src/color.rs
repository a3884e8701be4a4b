//! Embed accent colors

pub const COLOR_SUCCESS: u32 = 0x1ac600;
pub const COLOR_FAILURE: u32 = 0xff3232;
pub const COLOR_DEFAULT: u32 = 0xffd930;

/// Picks the embed color for a run.
///
/// A parseable hex override (`#ff00ff` or `ff00ff`) always wins. Anything
/// else, including garbage, falls back to the color for `build_status`.
pub fn resolve_color(override_hex: &str, build_status: &str) -> u32 {
    if !override_hex.is_empty() {
        let hex = override_hex.replace('#', "");
        if let Ok(color) = u32::from_str_radix(&hex, 16) {
            return color;
        }
    }

    status_color(build_status)
}

/// Green for success, red for failure/error/killed, yellow otherwise.
pub fn status_color(build_status: &str) -> u32 {
    match build_status {
        "success" => COLOR_SUCCESS,
        "failure" | "error" | "killed" => COLOR_FAILURE,
        _ => COLOR_DEFAULT,
    }
}
