use crate::error::{input_error, EngineError};

/// Tagged color value. Parsing is explicit: the numeric core never sniffs
/// string formats at use sites.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// Packed 0xRRGGBB.
    Hex(u32),
    /// Hue as a fraction of a full turn in [0,1); saturation/lightness in [0,1].
    Hsl { h: f32, s: f32, l: f32 },
    Rgba { r: u8, g: u8, b: u8, a: f32 },
}

impl Color {
    pub fn parse(text: &str) -> Result<Self, EngineError> {
        let t = text.trim();
        if let Some(hex) = t.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(body) = strip_call(t, "hsl") {
            return parse_hsl(body);
        }
        if let Some(body) = strip_call(t, "rgba") {
            return parse_rgba(body, true);
        }
        if let Some(body) = strip_call(t, "rgb") {
            return parse_rgba(body, false);
        }
        Err(input_error(
            "color",
            format!("unrecognized color '{t}' (expected #rrggbb, hsl(..), rgb(..) or rgba(..))"),
        ))
    }

    pub fn format(&self) -> String {
        match *self {
            Self::Hex(v) => format!("#{:06x}", v & 0x00FF_FFFF),
            Self::Hsl { h, s, l } => format!(
                "hsl({:.0}, {:.0}%, {:.0}%)",
                fract01(h) * 360.0,
                s.clamp(0.0, 1.0) * 100.0,
                l.clamp(0.0, 1.0) * 100.0
            ),
            Self::Rgba { r, g, b, a } => format!("rgba({r}, {g}, {b}, {:.2})", a.clamp(0.0, 1.0)),
        }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        match self {
            Self::Hex(v) => [
                ((v >> 16) & 0xFF) as u8,
                ((v >> 8) & 0xFF) as u8,
                (v & 0xFF) as u8,
                255,
            ],
            Self::Hsl { h, s, l } => {
                let (r, g, b) = hsl_to_rgb(h, s, l);
                [r, g, b, 255]
            }
            Self::Rgba { r, g, b, a } => [r, g, b, (a.clamp(0.0, 1.0) * 255.0).round() as u8],
        }
    }

    /// Rotate hue by `amount` turns (modular addition in [0,1)).
    pub fn rotate_hue(self, amount: f32) -> Self {
        let [r, g, b, _] = self.to_rgba8();
        let (h, s, l) = rgb_to_hsl(r, g, b);
        Self::Hsl {
            h: fract01(h + amount),
            s,
            l,
        }
    }
}

fn strip_call<'a>(t: &'a str, name: &str) -> Option<&'a str> {
    t.strip_prefix(name)?.trim().strip_prefix('(')?.strip_suffix(')')
}

fn parse_hex(hex: &str) -> Result<Color, EngineError> {
    let expanded;
    let digits = match hex.len() {
        3 => {
            let mut s = String::with_capacity(6);
            for ch in hex.chars() {
                s.push(ch);
                s.push(ch);
            }
            expanded = s;
            expanded.as_str()
        }
        6 => hex,
        _ => {
            return Err(input_error("color", format!("bad hex length in '#{hex}'")));
        }
    };
    u32::from_str_radix(digits, 16)
        .map(Color::Hex)
        .map_err(|_| input_error("color", format!("bad hex digits in '#{hex}'")))
}

fn parse_hsl(body: &str) -> Result<Color, EngineError> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(input_error("color", "hsl() takes exactly three components"));
    }
    let h = parse_component(parts[0], "hue")? / 360.0;
    let s = parse_percent(parts[1], "saturation")?;
    let l = parse_percent(parts[2], "lightness")?;
    Ok(Color::Hsl {
        h: fract01(h),
        s,
        l,
    })
}

fn parse_rgba(body: &str, with_alpha: bool) -> Result<Color, EngineError> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return Err(input_error(
            "color",
            format!("expected {expected} components, got {}", parts.len()),
        ));
    }
    let channel = |s: &str, name: &'static str| -> Result<u8, EngineError> {
        s.parse::<u8>()
            .map_err(|_| input_error("color", format!("bad {name} channel '{s}'")))
    };
    let a = if with_alpha {
        let v = parse_component(parts[3], "alpha")?;
        if !(0.0..=1.0).contains(&v) {
            return Err(input_error("color", "alpha must be in [0,1]"));
        }
        v
    } else {
        1.0
    };
    Ok(Color::Rgba {
        r: channel(parts[0], "red")?,
        g: channel(parts[1], "green")?,
        b: channel(parts[2], "blue")?,
        a,
    })
}

fn parse_component(s: &str, name: &'static str) -> Result<f32, EngineError> {
    let v = s
        .parse::<f32>()
        .map_err(|_| input_error("color", format!("bad {name} component '{s}'")))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(input_error("color", format!("{name} must be finite")))
    }
}

fn parse_percent(s: &str, name: &'static str) -> Result<f32, EngineError> {
    let digits = s
        .strip_suffix('%')
        .ok_or_else(|| input_error("color", format!("{name} must end with '%'")))?;
    let v = parse_component(digits, name)?;
    if !(0.0..=100.0).contains(&v) {
        return Err(input_error("color", format!("{name} must be in [0,100]%")));
    }
    Ok(v / 100.0)
}

/// RGB bytes to (h, s, l) with hue as a fraction of 360° in [0,1).
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) * 0.5;
    if max == min {
        return (0.0, 0.0, l);
    }
    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let sector = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (fract01(sector / 6.0), s, l)
}

/// (h, s, l) with hue in [0,1) back to RGB bytes.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    let h = fract01(h);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return (v, v, v);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let channel = |t: f32| -> u8 {
        let t = fract01(t);
        let v = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    };
    (
        channel(h + 1.0 / 3.0),
        channel(h),
        channel(h - 1.0 / 3.0),
    )
}

pub fn fract01(x: f32) -> f32 {
    let f = x - x.floor();
    if f < 0.0 { f + 1.0 } else { f }
}

/// The three collaborator-supplied scene colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenePalette {
    pub sky: Color,
    pub terrain: Color,
    pub accent: Color,
}

impl ScenePalette {
    pub fn parse(sky: &str, terrain: &str, accent: &str) -> Result<Self, EngineError> {
        Ok(Self {
            sky: Color::parse(sky)?,
            terrain: Color::parse(terrain)?,
            accent: Color::parse(accent)?,
        })
    }
}

impl Default for ScenePalette {
    fn default() -> Self {
        Self {
            sky: Color::Hex(0x27356b),
            terrain: Color::Hex(0x3f8f5a),
            accent: Color::Hex(0xe8c36a),
        }
    }
}

/// Collaborator-supplied sentiment label; never inferred here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Bright,
    Calm,
    Somber,
}

impl Sentiment {
    pub fn label(self) -> &'static str {
        match self {
            Self::Bright => "Bright",
            Self::Calm => "Calm",
            Self::Somber => "Somber",
        }
    }
}
