use std::fmt;

use crate::{
    foundation::core::{CanvasSize, Theme},
    scene::Scene,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SvgOptions {
    /// Embed CSS for hover emphasis and the staggered entrance. Static output is what
    /// rasterizers consume.
    pub animated: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self { animated: true }
    }
}

impl Scene {
    pub fn to_svg(&self, opts: SvgOptions) -> String {
        SceneSvg { scene: self, opts }.to_string()
    }
}

struct SceneSvg<'a> {
    scene: &'a Scene,
    opts: SvgOptions,
}

impl fmt::Display for SceneSvg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.scene;
        open_svg(f, s.canvas, s.theme)?;

        if self.opts.animated {
            f.write_str("<style>")?;
            write!(
                f,
                ".wc-word{{cursor:default;transition:font-size {t}ms,opacity {t}ms;animation:wc-reveal {d}ms {e} backwards}}",
                t = s.hover_transition_ms,
                d = s.nodes.first().map_or(0.0, |n| n.reveal.duration_ms),
                e = s.reveal_ease.css(),
            )?;
            f.write_str(
                ".wc-word:hover{opacity:1;filter:drop-shadow(0 4px 8px rgba(0,0,0,0.2))}",
            )?;
            write!(
                f,
                "@keyframes wc-reveal{{from{{opacity:0}}to{{opacity:{}}}}}",
                num(s.opacity)
            )?;
            for (i, n) in s.nodes.iter().enumerate() {
                write!(f, "#w{i}:hover{{font-size:{}px}}", num(n.hover_font_size))?;
            }
            f.write_str("</style>")?;
        }

        background(f, s.canvas, s.theme)?;
        write!(
            f,
            r#"<g transform="translate({},{})">"#,
            num(s.canvas.width * 0.5),
            num(s.canvas.height * 0.5)
        )?;
        for (i, n) in s.nodes.iter().enumerate() {
            write!(
                f,
                r#"<text id="w{i}" class="wc-word" transform="translate({},{}) rotate({})" text-anchor="middle" dominant-baseline="central" font-family="{}" font-size="{}" font-weight="{}" fill="{}" opacity="{}""#,
                num(n.offset.x),
                num(n.offset.y),
                num(n.rotation),
                Escaped(&s.font_family),
                num(n.font_size),
                n.weight.css_weight(),
                n.color.to_hex(),
                num(s.opacity),
            )?;
            if self.opts.animated {
                write!(f, r#" style="animation-delay:{}ms""#, num(n.reveal.delay_ms))?;
            }
            write!(f, ">{}</text>", Escaped(&n.text))?;
        }
        f.write_str("</g></svg>")
    }
}

/// Empty-state placeholder shown while no responses exist for the active question.
pub fn waiting_svg(canvas: CanvasSize, theme: Theme, font_family: &str) -> String {
    WaitingSvg {
        canvas,
        theme,
        font_family,
    }
    .to_string()
}

struct WaitingSvg<'a> {
    canvas: CanvasSize,
    theme: Theme,
    font_family: &'a str,
}

impl fmt::Display for WaitingSvg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        open_svg(f, self.canvas, self.theme)?;
        background(f, self.canvas, self.theme)?;
        let fill = match self.theme {
            Theme::Light => "#6B7280",
            Theme::Dark => "#9CA3AF",
        };
        let cx = num(self.canvas.width * 0.5);
        let cy = self.canvas.height * 0.5;
        write!(
            f,
            r#"<text class="wc-waiting" x="{cx}" y="{}" text-anchor="middle" font-family="{}" font-size="18" font-weight="500" fill="{fill}">Waiting for responses...</text>"#,
            num(cy - 10.0),
            Escaped(self.font_family),
        )?;
        write!(
            f,
            r#"<text x="{cx}" y="{}" text-anchor="middle" font-family="{}" font-size="14" fill="{fill}">Words will appear here as participants submit their answers</text>"#,
            num(cy + 16.0),
            Escaped(self.font_family),
        )?;
        f.write_str("</svg>")
    }
}

fn open_svg(f: &mut fmt::Formatter<'_>, canvas: CanvasSize, theme: Theme) -> fmt::Result {
    let w = num(canvas.width);
    let h = num(canvas.height);
    write!(
        f,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" class="word-cloud-{}">"#,
        theme.as_str()
    )
}

fn background(f: &mut fmt::Formatter<'_>, canvas: CanvasSize, theme: Theme) -> fmt::Result {
    let (center_alpha, edge) = match theme {
        Theme::Light => ("0.05", "rgb(255,255,255)"),
        Theme::Dark => ("0.1", "rgb(0,0,0)"),
    };
    let id = theme.as_str();
    write!(
        f,
        r#"<defs><radialGradient id="wordcloud-gradient-{id}" cx="50%" cy="50%" r="50%"><stop offset="0%" stop-color="rgb(59,130,246)" stop-opacity="{center_alpha}"/><stop offset="100%" stop-color="{edge}" stop-opacity="0"/></radialGradient></defs>"#
    )?;
    write!(
        f,
        r#"<rect width="{}" height="{}" fill="url(#wordcloud-gradient-{id})"/>"#,
        num(canvas.width),
        num(canvas.height)
    )
}

/// Compact decimal: at most two fractional digits, no trailing zeros, no `-0`.
fn num(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// Characters allowed in an XML 1.0 document.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..
    )
}

struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&apos;")?,
                c if is_xml_char(c) => fmt::Write::write_char(f, c)?,
                _ => f.write_str("\u{FFFD}")?,
            }
        }
        Ok(())
    }
}
