//! Formula rendering for suggestion text.
//!
//! Labels coming back from the server may carry inline TeX (`$\alpha_1$`,
//! `\(x^2\)`). A [`Typesetter`] runs over every freshly rendered result set
//! and rewrites the display text of each fragment.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::fragment::Fragment;

pub trait Typesetter: Send + Sync {
    fn typeset(&self, text: &str) -> String;

    fn typeset_all(&self, fragments: &mut [Fragment]) {
        for fragment in fragments {
            let display = self.typeset(fragment.text());
            fragment.set_display(display);
        }
    }
}

/// Leaves text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Typesetter for Passthrough {
    fn typeset(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Rewrites inline TeX into Unicode approximations.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeMath;

/// `$…$` must hug its content and not be followed by a digit, so prices like
/// `$5 and $10` stay plain text. The trailing digit is captured and checked in
/// the replacer.
static MATH_SPAN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(?P<dollar>[^$\s](?:[^$]*[^$\s])?)\$(?P<next>\d?)|\\\((?P<paren>.+?)\\\)")
        .expect("valid math span regex")
});

static COMMAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\([A-Za-z]+|[,;! ])").expect("valid command regex"));

static SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([_^])(\{[^{}]*\}|[^{}\s])").expect("valid script regex"));

impl Typesetter for UnicodeMath {
    fn typeset(&self, text: &str) -> String {
        MATH_SPAN_RE
            .replace_all(text, |caps: &Captures| {
                if caps.name("next").is_some_and(|m| !m.is_empty()) {
                    return caps[0].to_string();
                }
                let tex = caps
                    .name("dollar")
                    .or_else(|| caps.name("paren"))
                    .map_or("", |m| m.as_str());
                render_tex(tex)
            })
            .into_owned()
    }
}

fn render_tex(tex: &str) -> String {
    let symbols = COMMAND_RE.replace_all(tex, |caps: &Captures| {
        let name = &caps[1];
        symbol(name).map_or_else(|| name.to_string(), str::to_string)
    });

    let scripted = SCRIPT_RE.replace_all(&symbols, |caps: &Captures| {
        let body = caps[2].trim_start_matches('{').trim_end_matches('}');
        let table: fn(char) -> Option<char> = if &caps[1] == "_" { subscript } else { superscript };
        match body.chars().map(table).collect::<Option<String>>() {
            Some(mapped) => mapped,
            None => format!("{}({body})", &caps[1]),
        }
    });

    scripted.replace(['{', '}'], "").trim().to_string()
}

fn symbol(name: &str) -> Option<&'static str> {
    let s = match name {
        "alpha" => "α",
        "beta" => "β",
        "gamma" => "γ",
        "delta" => "δ",
        "epsilon" | "varepsilon" => "ε",
        "zeta" => "ζ",
        "eta" => "η",
        "theta" | "vartheta" => "θ",
        "iota" => "ι",
        "kappa" => "κ",
        "lambda" => "λ",
        "mu" => "μ",
        "nu" => "ν",
        "xi" => "ξ",
        "pi" => "π",
        "rho" => "ρ",
        "sigma" => "σ",
        "tau" => "τ",
        "phi" | "varphi" => "φ",
        "chi" => "χ",
        "psi" => "ψ",
        "omega" => "ω",
        "Gamma" => "Γ",
        "Delta" => "Δ",
        "Theta" => "Θ",
        "Lambda" => "Λ",
        "Pi" => "Π",
        "Sigma" => "Σ",
        "Phi" => "Φ",
        "Psi" => "Ψ",
        "Omega" => "Ω",
        "infty" => "∞",
        "partial" => "∂",
        "nabla" => "∇",
        "sum" => "∑",
        "prod" => "∏",
        "int" => "∫",
        "sqrt" => "√",
        "cdot" => "·",
        "times" => "×",
        "pm" => "±",
        "leq" | "le" => "≤",
        "geq" | "ge" => "≥",
        "neq" | "ne" => "≠",
        "approx" => "≈",
        "equiv" => "≡",
        "in" => "∈",
        "notin" => "∉",
        "subset" => "⊂",
        "subseteq" => "⊆",
        "cup" => "∪",
        "cap" => "∩",
        "forall" => "∀",
        "exists" => "∃",
        "to" | "rightarrow" => "→",
        "leftarrow" => "←",
        "Rightarrow" => "⇒",
        "mapsto" => "↦",
        "mathbb" | "mathrm" | "mathbf" | "mathit" | "mathcal" | "text" | "operatorname"
        | "left" | "right" => "",
        "," | ";" | " " => " ",
        "!" => "",
        _ => return None,
    };
    Some(s)
}

fn subscript(c: char) -> Option<char> {
    let mapped = match c {
        '0'..='9' => char::from_u32(0x2080 + (c as u32 - '0' as u32))?,
        '+' => '₊',
        '-' => '₋',
        '=' => '₌',
        '(' => '₍',
        ')' => '₎',
        'a' => 'ₐ',
        'e' => 'ₑ',
        'i' => 'ᵢ',
        'j' => 'ⱼ',
        'k' => 'ₖ',
        'n' => 'ₙ',
        'o' => 'ₒ',
        't' => 'ₜ',
        'x' => 'ₓ',
        _ => return None,
    };
    Some(mapped)
}

fn superscript(c: char) -> Option<char> {
    let mapped = match c {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4'..='9' => char::from_u32(0x2074 + (c as u32 - '4' as u32))?,
        '+' => '⁺',
        '-' => '⁻',
        '=' => '⁼',
        '(' => '⁽',
        ')' => '⁾',
        'n' => 'ⁿ',
        'i' => 'ⁱ',
        'T' => 'ᵀ',
        _ => return None,
    };
    Some(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greek_and_scripts() {
        let t = UnicodeMath;
        assert_eq!(t.typeset(r"state $x_1$"), "state x₁");
        assert_eq!(t.typeset(r"$\alpha^2$ gain"), "α² gain");
        assert_eq!(t.typeset(r"\(\omega_{10}\)"), "ω₁₀");
    }

    #[test]
    fn test_unmappable_script_falls_back() {
        assert_eq!(UnicodeMath.typeset(r"$x_{q}$"), "x_(q)");
    }

    #[test]
    fn test_font_commands_are_dropped() {
        assert_eq!(UnicodeMath.typeset(r"$\mathbb{R}^n$"), "Rⁿ");
    }

    #[test]
    fn test_text_without_math_is_unchanged() {
        let text = r#"R15["is subclass of"] costs $5"#;
        assert_eq!(UnicodeMath.typeset(text), text);
    }

    #[test]
    fn test_currency_amounts_are_not_math() {
        let text = "price $5 and $10 total";
        assert_eq!(UnicodeMath.typeset(text), text);
        assert_eq!(UnicodeMath.typeset("from $ 3 to $ 4"), "from $ 3 to $ 4");
    }

    #[test]
    fn test_span_followed_by_digit_is_left_alone() {
        assert_eq!(UnicodeMath.typeset("$x$1 and $y$"), "$x$1 and y");
    }

    #[test]
    fn test_typeset_all_rewrites_display_only() {
        let mut frags = vec![Fragment::parse(r"<b>$\beta$</b>"), Fragment::parse("plain")];
        UnicodeMath.typeset_all(&mut frags);
        assert_eq!(frags[0].display(), "β");
        assert_eq!(frags[0].text(), r"$\beta$");
        assert_eq!(frags[1].display(), "plain");
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(Passthrough.typeset(r"$\alpha$"), r"$\alpha$");
    }
}
