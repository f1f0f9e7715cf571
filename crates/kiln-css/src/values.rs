//! Shared value helpers used by every property mapper.
//!
//! Values are handled as text: the converter never computes lengths, it only
//! normalizes them into the string forms the output schema expects.

use indexmap::IndexMap;
use serde_json::{Map, Value, json};

/// `var()` chains deeper than this are left partially unresolved.
pub const MAX_VAR_PASSES: usize = 10;

/// Split `value` on `separator` wherever it is not inside parentheses or quotes.
///
/// Empty parts are dropped and every part is trimmed.
#[must_use]
pub fn split_top_level(value: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in value.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, c) if depth == 0 && is_separator(c, separator) => {
                parts.push(&value[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

fn is_separator(c: char, separator: char) -> bool {
    if separator == ' ' {
        c.is_ascii_whitespace()
    } else {
        c == separator
    }
}

/// Whitespace-separated tokens, keeping function calls such as
/// `rgba(0, 0, 0, .5)` intact.
#[must_use]
pub fn split_spaces(value: &str) -> Vec<&str> {
    split_top_level(value, ' ')
}

/// Comma-separated layers (`box-shadow`, `background`, `transition`).
#[must_use]
pub fn split_commas(value: &str) -> Vec<&str> {
    split_top_level(value, ',')
}

/// Numeric part of a bare pixel length (`"16px"` gives `"16"`).
#[must_use]
pub fn strip_px(value: &str) -> Option<&str> {
    let number = value.trim().strip_suffix("px")?;
    number.parse::<f64>().ok().map(|_| number)
}

/// [CSS Values § 5](https://www.w3.org/TR/css-values-4/#lengths)
///
/// Pixel lengths become unitless numbers; unitless zero stays `"0"`; every
/// other unit, keyword and function call passes through unchanged.
#[must_use]
pub fn normalize_length(value: &str) -> String {
    let value = value.trim();
    strip_px(value).map_or_else(|| value.to_string(), str::to_string)
}

/// Whether the token looks like a length, percentage or length-producing function.
#[must_use]
pub fn is_length(token: &str) -> bool {
    let token = token.trim();
    if token == "0" || token == "auto" {
        return true;
    }
    let lower = token.to_ascii_lowercase();
    if ["calc(", "clamp(", "min(", "max(", "var("]
        .iter()
        .any(|f| lower.starts_with(f))
    {
        return true;
    }
    let number_end = token
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map_or(token.len(), |(i, _)| i);
    if number_end == 0 || token[..number_end].parse::<f64>().is_err() {
        return false;
    }
    let unit = &lower[number_end..];
    matches!(
        unit,
        "" | "px" | "%" | "em" | "rem" | "vh" | "vw" | "vmin" | "vmax" | "ch" | "ex" | "pt"
            | "pc" | "cm" | "mm" | "in" | "fr" | "svh" | "lvh" | "dvh" | "q"
    )
}

/// [CSS Box § 4](https://www.w3.org/TR/css-box-4/#margin-shorthand)
///
/// Expand a 1–4 value box shorthand into `[top, right, bottom, left]`:
/// "If there is only one component value, it applies to all sides. If there
/// are two values, the top and bottom are set to the first value and the
/// right and left are set to the second. If there are three values, the top
/// is set to the first value, the left and right are set to the second, and
/// the bottom is set to the third. If there are four values they apply to the
/// top, right, bottom, and left, respectively."
#[must_use]
pub fn expand_box(value: &str) -> Option<[String; 4]> {
    let parts = split_spaces(value);
    let [top, right, bottom, left] = match parts.as_slice() {
        [all] => [*all, *all, *all, *all],
        [vertical, horizontal] => [*vertical, *horizontal, *vertical, *horizontal],
        [top, horizontal, bottom] => [*top, *horizontal, *bottom, *horizontal],
        [top, right, bottom, left] => [*top, *right, *bottom, *left],
        _ => return None,
    };
    Some([
        top.to_string(),
        right.to_string(),
        bottom.to_string(),
        left.to_string(),
    ])
}

/// [CSS Variables § 3](https://www.w3.org/TR/css-variables-1/#using-variables)
///
/// Replace `var(--name[, fallback])` with the variable's value, or the
/// fallback when the variable is unknown. References with neither stay as
/// written. Runs at most [`MAX_VAR_PASSES`] passes so circular definitions
/// terminate.
#[must_use]
pub fn resolve_vars(value: &str, variables: &IndexMap<String, String>) -> String {
    let mut current = value.to_string();
    for _ in 0..MAX_VAR_PASSES {
        let next = substitute_once(&current, variables);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn substitute_once(value: &str, variables: &IndexMap<String, String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = find_var_call(rest) {
        out.push_str(&rest[..start]);
        let after = &rest[start + 4..];
        let Some(close) = matching_paren(after) else {
            out.push_str(&rest[start..]);
            return out;
        };
        let args = &after[..close];
        let (name, fallback) = match args.find(',') {
            Some(comma) => (args[..comma].trim(), Some(args[comma + 1..].trim())),
            None => (args.trim(), None),
        };
        match (variables.get(name), fallback) {
            (Some(resolved), _) => out.push_str(resolved.trim()),
            (None, Some(fallback)) => out.push_str(fallback),
            (None, None) => out.push_str(&rest[start..start + 4 + close + 1]),
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

fn find_var_call(value: &str) -> Option<usize> {
    let lower = value.to_ascii_lowercase();
    let mut from = 0;
    while let Some(found) = lower[from..].find("var(") {
        let index = from + found;
        let preceded_by_ident = lower[..index]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !preceded_by_ident {
            return Some(index);
        }
        from = index + 4;
    }
    None
}

/// Byte index of the `)` closing an already-opened parenthesis.
fn matching_paren(value: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in value.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Function name and argument text of a call like `rotate(45deg)`.
#[must_use]
pub fn parse_function(value: &str) -> Option<(String, &str)> {
    let value = value.trim();
    let open = value.find('(')?;
    let name = &value[..open];
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return None;
    }
    let close = matching_paren(&value[open + 1..])? + open + 1;
    if close + 1 != value.len() {
        return None;
    }
    Some((name.to_ascii_lowercase(), value[open + 1..close].trim()))
}

/// `backgroundColor` to `background-color`; kebab-case input is returned as-is.
#[must_use]
pub fn camel_to_kebab(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// [CSSOM § 2.1](https://www.w3.org/TR/cssom-1/#serialize-an-identifier)
///
/// Escape a class name for use after `.` in a selector (`w-1/2` gives `w-1\/2`).
#[must_use]
pub fn escape_class_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, c) in name.chars().enumerate() {
        let plain = c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii();
        if !plain || (i == 0 && c.is_ascii_digit()) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// ===== Colors =====

/// Whether a shorthand token is a color.
#[must_use]
pub fn is_color(token: &str) -> bool {
    let lower = token.trim().to_ascii_lowercase();
    lower.starts_with('#')
        || ["rgb(", "rgba(", "hsl(", "hsla(", "hwb(", "lab(", "lch(", "oklch(", "oklab(", "color("]
            .iter()
            .any(|f| lower.starts_with(f))
        || lower == "transparent"
        || lower == "currentcolor"
        || named_color(&lower).is_some()
}

/// [CSS Color § 4](https://www.w3.org/TR/css-color-4/)
///
/// Structured color setting:
/// - 3/6-digit hex and named colors: `{hex}`
/// - 4/8-digit hex: `{hex, rgb}` where `rgb` is the alpha-carrying `rgba()` twin
/// - `rgb()`/`rgba()`: `{rgb}`; `hsl()`/`hsla()`: `{hsl}`
/// - `transparent`: `{hex, rgb, hsl}`
/// - anything else (`var()`, `currentColor`, other color spaces): `{raw}`
#[must_use]
pub fn color_setting(value: &str) -> Value {
    let value = value.trim();
    let lower = value.to_ascii_lowercase();
    let mut out = Map::new();

    if lower == "transparent" {
        let _ = out.insert("hex".into(), json!("transparent"));
        let _ = out.insert("rgb".into(), json!("rgba(0, 0, 0, 0)"));
        let _ = out.insert("hsl".into(), json!("hsla(0, 0%, 0%, 0)"));
    } else if let Some(hex) = lower.strip_prefix('#') {
        match parse_hex(hex) {
            Some((r, g, b, None)) if hex.len() == 3 || hex.len() == 6 => {
                let _ = out.insert("hex".into(), json!(format!("#{r:02x}{g:02x}{b:02x}")));
            }
            Some((r, g, b, Some(a))) => {
                let _ = out.insert("hex".into(), json!(lower));
                let alpha = format_alpha(f64::from(a) / 255.0);
                let _ = out.insert("rgb".into(), json!(format!("rgba({r}, {g}, {b}, {alpha})")));
            }
            _ => {
                let _ = out.insert("raw".into(), json!(value));
            }
        }
    } else if lower.starts_with("rgb(") || lower.starts_with("rgba(") {
        let _ = out.insert("rgb".into(), json!(value));
    } else if lower.starts_with("hsl(") || lower.starts_with("hsla(") {
        let _ = out.insert("hsl".into(), json!(value));
    } else if let Some(rgb) = named_color(&lower) {
        let _ = out.insert("hex".into(), json!(format!("#{rgb:06x}")));
    } else {
        let _ = out.insert("raw".into(), json!(value));
    }
    Value::Object(out)
}

/// `(r, g, b, alpha)` from 3, 4, 6 or 8 hex digits.
fn parse_hex(hex: &str) -> Option<(u8, u8, u8, Option<u8>)> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok();
    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some((digit(0)? * 17, digit(1)? * 17, digit(2)? * 17, None)),
        4 => Some((
            digit(0)? * 17,
            digit(1)? * 17,
            digit(2)? * 17,
            Some(digit(3)? * 17),
        )),
        6 => Some((pair(0)?, pair(2)?, pair(4)?, None)),
        8 => Some((pair(0)?, pair(2)?, pair(4)?, Some(pair(6)?))),
        _ => None,
    }
}

/// Two decimals at most, without trailing zeros (`0.5`, `0.53`, `1`).
fn format_alpha(alpha: f64) -> String {
    let rounded = (alpha * 100.0).round() / 100.0;
    format!("{rounded}")
}

/// [CSS Color § 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
#[must_use]
pub fn named_color(name: &str) -> Option<u32> {
    NAMED_COLORS
        .binary_search_by(|(n, _)| (*n).cmp(name))
        .ok()
        .map(|i| NAMED_COLORS[i].1)
}

/// Sorted by name for binary search.
#[rustfmt::skip]
#[allow(clippy::unreadable_literal)]
const NAMED_COLORS: &[(&str, u32)] = &[
    ("aliceblue", 0xf0f8ff), ("antiquewhite", 0xfaebd7), ("aqua", 0x00ffff),
    ("aquamarine", 0x7fffd4), ("azure", 0xf0ffff), ("beige", 0xf5f5dc),
    ("bisque", 0xffe4c4), ("black", 0x000000), ("blanchedalmond", 0xffebcd),
    ("blue", 0x0000ff), ("blueviolet", 0x8a2be2), ("brown", 0xa52a2a),
    ("burlywood", 0xdeb887), ("cadetblue", 0x5f9ea0), ("chartreuse", 0x7fff00),
    ("chocolate", 0xd2691e), ("coral", 0xff7f50), ("cornflowerblue", 0x6495ed),
    ("cornsilk", 0xfff8dc), ("crimson", 0xdc143c), ("cyan", 0x00ffff),
    ("darkblue", 0x00008b), ("darkcyan", 0x008b8b), ("darkgoldenrod", 0xb8860b),
    ("darkgray", 0xa9a9a9), ("darkgreen", 0x006400), ("darkgrey", 0xa9a9a9),
    ("darkkhaki", 0xbdb76b), ("darkmagenta", 0x8b008b), ("darkolivegreen", 0x556b2f),
    ("darkorange", 0xff8c00), ("darkorchid", 0x9932cc), ("darkred", 0x8b0000),
    ("darksalmon", 0xe9967a), ("darkseagreen", 0x8fbc8f), ("darkslateblue", 0x483d8b),
    ("darkslategray", 0x2f4f4f), ("darkslategrey", 0x2f4f4f), ("darkturquoise", 0x00ced1),
    ("darkviolet", 0x9400d3), ("deeppink", 0xff1493), ("deepskyblue", 0x00bfff),
    ("dimgray", 0x696969), ("dimgrey", 0x696969), ("dodgerblue", 0x1e90ff),
    ("firebrick", 0xb22222), ("floralwhite", 0xfffaf0), ("forestgreen", 0x228b22),
    ("fuchsia", 0xff00ff), ("gainsboro", 0xdcdcdc), ("ghostwhite", 0xf8f8ff),
    ("gold", 0xffd700), ("goldenrod", 0xdaa520), ("gray", 0x808080),
    ("green", 0x008000), ("greenyellow", 0xadff2f), ("grey", 0x808080),
    ("honeydew", 0xf0fff0), ("hotpink", 0xff69b4), ("indianred", 0xcd5c5c),
    ("indigo", 0x4b0082), ("ivory", 0xfffff0), ("khaki", 0xf0e68c),
    ("lavender", 0xe6e6fa), ("lavenderblush", 0xfff0f5), ("lawngreen", 0x7cfc00),
    ("lemonchiffon", 0xfffacd), ("lightblue", 0xadd8e6), ("lightcoral", 0xf08080),
    ("lightcyan", 0xe0ffff), ("lightgoldenrodyellow", 0xfafad2), ("lightgray", 0xd3d3d3),
    ("lightgreen", 0x90ee90), ("lightgrey", 0xd3d3d3), ("lightpink", 0xffb6c1),
    ("lightsalmon", 0xffa07a), ("lightseagreen", 0x20b2aa), ("lightskyblue", 0x87cefa),
    ("lightslategray", 0x778899), ("lightslategrey", 0x778899), ("lightsteelblue", 0xb0c4de),
    ("lightyellow", 0xffffe0), ("lime", 0x00ff00), ("limegreen", 0x32cd32),
    ("linen", 0xfaf0e6), ("magenta", 0xff00ff), ("maroon", 0x800000),
    ("mediumaquamarine", 0x66cdaa), ("mediumblue", 0x0000cd), ("mediumorchid", 0xba55d3),
    ("mediumpurple", 0x9370db), ("mediumseagreen", 0x3cb371), ("mediumslateblue", 0x7b68ee),
    ("mediumspringgreen", 0x00fa9a), ("mediumturquoise", 0x48d1cc), ("mediumvioletred", 0xc71585),
    ("midnightblue", 0x191970), ("mintcream", 0xf5fffa), ("mistyrose", 0xffe4e1),
    ("moccasin", 0xffe4b5), ("navajowhite", 0xffdead), ("navy", 0x000080),
    ("oldlace", 0xfdf5e6), ("olive", 0x808000), ("olivedrab", 0x6b8e23),
    ("orange", 0xffa500), ("orangered", 0xff4500), ("orchid", 0xda70d6),
    ("palegoldenrod", 0xeee8aa), ("palegreen", 0x98fb98), ("paleturquoise", 0xafeeee),
    ("palevioletred", 0xdb7093), ("papayawhip", 0xffefd5), ("peachpuff", 0xffdab9),
    ("peru", 0xcd853f), ("pink", 0xffc0cb), ("plum", 0xdda0dd),
    ("powderblue", 0xb0e0e6), ("purple", 0x800080), ("rebeccapurple", 0x663399),
    ("red", 0xff0000), ("rosybrown", 0xbc8f8f), ("royalblue", 0x4169e1),
    ("saddlebrown", 0x8b4513), ("salmon", 0xfa8072), ("sandybrown", 0xf4a460),
    ("seagreen", 0x2e8b57), ("seashell", 0xfff5ee), ("sienna", 0xa0522d),
    ("silver", 0xc0c0c0), ("skyblue", 0x87ceeb), ("slateblue", 0x6a5acd),
    ("slategray", 0x708090), ("slategrey", 0x708090), ("snow", 0xfffafa),
    ("springgreen", 0x00ff7f), ("steelblue", 0x4682b4), ("tan", 0xd2b48c),
    ("teal", 0x008080), ("thistle", 0xd8bfd8), ("tomato", 0xff6347),
    ("turquoise", 0x40e0d0), ("violet", 0xee82ee), ("wheat", 0xf5deb3),
    ("white", 0xffffff), ("whitesmoke", 0xf5f5f5), ("yellow", 0xffff00),
    ("yellowgreen", 0x9acd32),
];

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_split_spaces_keeps_functions() {
        assert_eq!(
            split_spaces("0 4px 8px rgba(0, 0, 0, 0.2)"),
            vec!["0", "4px", "8px", "rgba(0, 0, 0, 0.2)"]
        );
    }

    #[test]
    fn test_split_commas_respects_quotes() {
        assert_eq!(
            split_commas("\"a, b\", serif"),
            vec!["\"a, b\"", "serif"]
        );
    }

    #[test]
    fn test_normalize_length() {
        assert_eq!(normalize_length("16px"), "16");
        assert_eq!(normalize_length("-1.5px"), "-1.5");
        assert_eq!(normalize_length("0"), "0");
        assert_eq!(normalize_length("2rem"), "2rem");
        assert_eq!(normalize_length("calc(100% - 20px)"), "calc(100% - 20px)");
        assert_eq!(normalize_length("var(--gap)"), "var(--gap)");
    }

    #[test]
    fn test_is_length() {
        assert!(is_length("10px"));
        assert!(is_length("-2em"));
        assert!(is_length("50%"));
        assert!(is_length("calc(1px + 2px)"));
        assert!(!is_length("solid"));
        assert!(!is_length("#fff"));
    }

    #[test]
    fn test_expand_box_three_values() {
        let [top, right, bottom, left] = expand_box("1px 2px 3px").unwrap();
        assert_eq!((top.as_str(), right.as_str()), ("1px", "2px"));
        assert_eq!((bottom.as_str(), left.as_str()), ("3px", "2px"));
        assert!(expand_box("1 2 3 4 5").is_none());
    }

    #[quickcheck]
    fn prop_expand_box_uniform(n: u16) -> bool {
        let value = format!("{n}px");
        expand_box(&value).is_some_and(|sides| sides.iter().all(|s| *s == value))
    }

    #[quickcheck]
    fn prop_expand_box_four_values_in_order(a: u8, b: u8, c: u8, d: u8) -> bool {
        let value = format!("{a}px {b}px {c}px {d}px");
        expand_box(&value) == Some([a, b, c, d].map(|n| format!("{n}px")))
    }

    #[test]
    fn test_resolve_vars_with_fallback_and_chain() {
        let mut vars = IndexMap::new();
        let _ = vars.insert("--base".to_string(), "8px".to_string());
        let _ = vars.insert("--gap".to_string(), "var(--base)".to_string());
        assert_eq!(resolve_vars("var(--gap)", &vars), "8px");
        assert_eq!(resolve_vars("var(--missing, 4px)", &vars), "4px");
        assert_eq!(resolve_vars("var(--missing)", &vars), "var(--missing)");
        assert_eq!(
            resolve_vars("calc(var(--base) * 2)", &vars),
            "calc(8px * 2)"
        );
    }

    #[test]
    fn test_resolve_vars_terminates_on_cycle() {
        let mut vars = IndexMap::new();
        let _ = vars.insert("--a".to_string(), "var(--b)".to_string());
        let _ = vars.insert("--b".to_string(), "var(--a)".to_string());
        let resolved = resolve_vars("var(--a)", &vars);
        assert!(resolved.starts_with("var(--"));
    }

    #[test]
    fn test_color_settings() {
        assert_eq!(color_setting("#FF0000"), json!({"hex": "#ff0000"}));
        assert_eq!(color_setting("#f00"), json!({"hex": "#ff0000"}));
        assert_eq!(color_setting("red"), json!({"hex": "#ff0000"}));
        assert_eq!(
            color_setting("#ff000080"),
            json!({"hex": "#ff000080", "rgb": "rgba(255, 0, 0, 0.5)"})
        );
        assert_eq!(
            color_setting("rgba(0, 0, 0, .5)"),
            json!({"rgb": "rgba(0, 0, 0, .5)"})
        );
        assert_eq!(color_setting("hsl(10, 50%, 50%)"), json!({"hsl": "hsl(10, 50%, 50%)"}));
        assert_eq!(color_setting("var(--brand)"), json!({"raw": "var(--brand)"}));
        let transparent = color_setting("transparent");
        assert_eq!(transparent["rgb"], json!("rgba(0, 0, 0, 0)"));
        assert!(transparent.get("hsl").is_some());
    }

    #[test]
    fn test_named_colors_sorted() {
        assert!(NAMED_COLORS.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_parse_function() {
        assert_eq!(
            parse_function("translate(10px, 20px)"),
            Some(("translate".to_string(), "10px, 20px"))
        );
        assert_eq!(parse_function("a(b) c(d)"), None);
    }

    #[test]
    fn test_escape_class_name() {
        assert_eq!(escape_class_name("w-1/2"), "w-1\\/2");
        assert_eq!(escape_class_name("md:flex"), "md\\:flex");
        assert_eq!(escape_class_name("v1.2"), "v1\\.2");
    }

    #[test]
    fn test_camel_to_kebab() {
        assert_eq!(camel_to_kebab("backgroundColor"), "background-color");
        assert_eq!(camel_to_kebab("font-size"), "font-size");
    }
}
