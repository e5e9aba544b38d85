//! Banner graphic generation
//!
//! A banner config file is replayed top-to-bottom into a list of events,
//! folded into an immutable [`BannerStyle`] by a pure reducer, and rendered
//! into SVG markup plus a companion resize script. The reducer owns the
//! precedence rules: last write wins for scalar keys, explicit `*.xy`
//! coordinates always beat align-derived ones.

use crate::lines::{
    escape_attr, escape_html_text, format_number, is_comment_or_blank, strip_inline_comment,
};
use crate::model::Diagnostic;

pub const BASE_FONT_SIZE: f64 = 60.0;
pub const DEFAULT_ASPECT: f64 = 8.0;
const VIEW_WIDTH: f64 = 800.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Title,
    Subtitle,
}

impl Element {
    pub fn as_str(self) -> &'static str {
        match self {
            Element::Title => "title",
            Element::Subtitle => "subtitle",
        }
    }

    /// Hard default baseline when neither alignment nor coordinates are set.
    fn default_y(self) -> &'static str {
        match self {
            Element::Title => "52%",
            Element::Subtitle => "82%",
        }
    }

    fn svg_id(self) -> &'static str {
        match self {
            Element::Title => "banner-title",
            Element::Subtitle => "banner-subtitle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "left" => Some(Align::Left),
            "center" => Some(Align::Center),
            "right" => Some(Align::Right),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }

    pub fn default_x(self) -> &'static str {
        match self {
            Align::Left => "5%",
            Align::Center => "50%",
            Align::Right => "95%",
        }
    }

    pub fn anchor(self) -> &'static str {
        match self {
            Align::Left => "start",
            Align::Center => "middle",
            Align::Right => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientDirection {
    LeftRight,
    TopBottom,
    UpperLeftLowerRight,
    LowerLeftUpperRight,
}

impl GradientDirection {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "lr" => Some(GradientDirection::LeftRight),
            "tb" => Some(GradientDirection::TopBottom),
            "ul-lr" => Some(GradientDirection::UpperLeftLowerRight),
            "ll-ur" => Some(GradientDirection::LowerLeftUpperRight),
            _ => None,
        }
    }

    /// Gradient line endpoints as (x1, y1, x2, y2).
    fn line(self) -> (&'static str, &'static str, &'static str, &'static str) {
        match self {
            GradientDirection::LeftRight => ("0%", "0%", "100%", "0%"),
            GradientDirection::TopBottom => ("0%", "0%", "0%", "100%"),
            GradientDirection::UpperLeftLowerRight => ("0%", "0%", "100%", "100%"),
            GradientDirection::LowerLeftUpperRight => ("0%", "100%", "100%", "0%"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Solid(String),
    Linear {
        start: String,
        end: String,
        direction: GradientDirection,
    },
    Radial {
        inner: String,
        outer: String,
        cx: String,
        cy: String,
        radius: String,
        /// Horizontal compression; defaults to 1/aspect at render time.
        compensation: Option<f64>,
    },
    Image(String),
}

/// One parsed banner directive. Parsing never fails; malformed lines are
/// skipped with a warning diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub enum BannerEvent {
    Background(Background),
    Aspect(f64),
    PreserveAspect(String),
    Font(String),
    TextColor(String),
    Color(Element, String),
    Align {
        element: Element,
        align: Align,
        x: Option<String>,
        y: Option<String>,
    },
    Scale(Element, f64),
    Style(Element, Vec<String>),
    Xy(Element, String, String),
}

pub fn parse_banner_config(input: &str) -> (Vec<BannerEvent>, Vec<Diagnostic>) {
    let mut events = Vec::new();
    let mut diagnostics = Vec::new();
    for raw_line in input.lines() {
        if is_comment_or_blank(raw_line) {
            continue;
        }
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let (key, rest) = match line.split_once(char::is_whitespace) {
            Some((key, rest)) => (key, rest.trim()),
            None => (line, ""),
        };
        match parse_directive(key, rest) {
            Ok(event) => events.push(event),
            Err(reason) => diagnostics.push(Diagnostic::warning(
                Some("banner"),
                format!("skipping banner directive '{line}': {reason}"),
            )),
        }
    }
    (events, diagnostics)
}

fn parse_directive(key: &str, rest: &str) -> Result<BannerEvent, String> {
    let args: Vec<&str> = rest.split_whitespace().collect();
    match key {
        "back.color" => match args.as_slice() {
            [color] => Ok(BannerEvent::Background(Background::Solid(
                (*color).to_string(),
            ))),
            _ => Err("expected one color".to_string()),
        },
        "back.linear" => match args.as_slice() {
            [start, end] => Ok(BannerEvent::Background(Background::Linear {
                start: (*start).to_string(),
                end: (*end).to_string(),
                direction: GradientDirection::LeftRight,
            })),
            [start, end, dir] => {
                let direction = GradientDirection::parse(dir)
                    .ok_or_else(|| format!("unknown direction '{dir}'"))?;
                Ok(BannerEvent::Background(Background::Linear {
                    start: (*start).to_string(),
                    end: (*end).to_string(),
                    direction,
                }))
            }
            _ => Err("expected two colors and an optional direction".to_string()),
        },
        "back.radial" => {
            let (inner, outer, geometry) = match args.as_slice() {
                [inner, outer] => (*inner, *outer, None),
                [inner, outer, cx, cy, radius] => (*inner, *outer, Some((*cx, *cy, *radius, None))),
                [inner, outer, cx, cy, radius, comp] => {
                    let comp = parse_positive(comp).ok_or_else(|| {
                        format!("aspect compensation '{comp}' must be a positive number")
                    })?;
                    (*inner, *outer, Some((*cx, *cy, *radius, Some(comp))))
                }
                _ => return Err("expected two colors and optional cx cy r [comp]".to_string()),
            };
            let (cx, cy, radius, compensation) = match geometry {
                Some((cx, cy, radius, comp)) => {
                    (cx.to_string(), cy.to_string(), radius.to_string(), comp)
                }
                None => ("50%".to_string(), "50%".to_string(), "75%".to_string(), None),
            };
            Ok(BannerEvent::Background(Background::Radial {
                inner: inner.to_string(),
                outer: outer.to_string(),
                cx,
                cy,
                radius,
                compensation,
            }))
        }
        "back.image" => {
            if rest.is_empty() {
                Err("expected an image path".to_string())
            } else {
                Ok(BannerEvent::Background(Background::Image(rest.to_string())))
            }
        }
        "aspect" => {
            let value = parse_positive(rest)
                .ok_or_else(|| format!("aspect '{rest}' must be a positive number"))?;
            Ok(BannerEvent::Aspect(value))
        }
        "preserve_aspect" => {
            if rest.is_empty() {
                Err("expected a mode".to_string())
            } else {
                Ok(BannerEvent::PreserveAspect(rest.to_string()))
            }
        }
        "text.font" => {
            if rest.is_empty() {
                Err("expected font names".to_string())
            } else {
                Ok(BannerEvent::Font(rest.to_string()))
            }
        }
        "text.color" => single_color(args.as_slice()).map(BannerEvent::TextColor),
        "title.color" => {
            single_color(args.as_slice()).map(|color| BannerEvent::Color(Element::Title, color))
        }
        "subtitle.color" => {
            single_color(args.as_slice()).map(|color| BannerEvent::Color(Element::Subtitle, color))
        }
        "title.align" => parse_align(Element::Title, args.as_slice()),
        "subtitle.align" => parse_align(Element::Subtitle, args.as_slice()),
        "title.scale" => parse_scale(Element::Title, rest),
        "subtitle.scale" => parse_scale(Element::Subtitle, rest),
        "title.style" => parse_style(Element::Title, args.as_slice()),
        "subtitle.style" => parse_style(Element::Subtitle, args.as_slice()),
        "title.xy" => parse_xy(Element::Title, args.as_slice()),
        "subtitle.xy" => parse_xy(Element::Subtitle, args.as_slice()),
        _ => Err("unknown key".to_string()),
    }
}

fn single_color(args: &[&str]) -> Result<String, String> {
    match args {
        [color] => Ok((*color).to_string()),
        _ => Err("expected one color".to_string()),
    }
}

fn parse_positive(token: &str) -> Option<f64> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
}

fn parse_align(element: Element, args: &[&str]) -> Result<BannerEvent, String> {
    let (dir, x, y) = match args {
        [dir] => (*dir, None, None),
        [dir, x] => (*dir, Some(*x), None),
        [dir, x, y] => (*dir, Some(*x), Some(*y)),
        _ => return Err("expected DIR [x] [y]".to_string()),
    };
    let align = Align::parse(dir).ok_or_else(|| format!("unknown direction '{dir}'"))?;
    let x = x.filter(|value| *value != "auto").map(str::to_string);
    let y = y.filter(|value| *value != "auto").map(str::to_string);
    Ok(BannerEvent::Align { element, align, x, y })
}

fn parse_scale(element: Element, rest: &str) -> Result<BannerEvent, String> {
    let value =
        parse_positive(rest).ok_or_else(|| format!("scale '{rest}' must be a positive number"))?;
    Ok(BannerEvent::Scale(element, value))
}

fn parse_style(element: Element, args: &[&str]) -> Result<BannerEvent, String> {
    if args.is_empty() {
        Err("expected style tokens".to_string())
    } else {
        Ok(BannerEvent::Style(
            element,
            args.iter().map(|token| (*token).to_string()).collect(),
        ))
    }
}

fn parse_xy(element: Element, args: &[&str]) -> Result<BannerEvent, String> {
    match args {
        [x, y] => Ok(BannerEvent::Xy(
            element,
            (*x).to_string(),
            (*y).to_string(),
        )),
        _ => Err("expected X Y".to_string()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub color: Option<String>,
    pub scale: f64,
    pub bold: bool,
    pub italic: bool,
    /// Literal font-style override from a non-bold/italic style token.
    pub literal_style: Option<String>,
    pub align: Option<Align>,
    pub align_x: Option<String>,
    pub align_y: Option<String>,
    pub xy: Option<(String, String)>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: None,
            scale: 1.0,
            bold: false,
            italic: false,
            literal_style: None,
            align: None,
            align_x: None,
            align_y: None,
            xy: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BannerStyle {
    pub background: Background,
    pub aspect: f64,
    pub preserve_aspect: Option<String>,
    pub font: String,
    pub text_color: String,
    pub title: TextStyle,
    pub subtitle: TextStyle,
}

impl Default for BannerStyle {
    fn default() -> Self {
        Self {
            background: Background::Solid("#33363b".to_string()),
            aspect: DEFAULT_ASPECT,
            preserve_aspect: None,
            font: "Georgia, serif".to_string(),
            text_color: "#ffffff".to_string(),
            title: TextStyle::default(),
            subtitle: TextStyle::default(),
        }
    }
}

impl BannerStyle {
    fn element(&self, element: Element) -> &TextStyle {
        match element {
            Element::Title => &self.title,
            Element::Subtitle => &self.subtitle,
        }
    }

    fn element_mut(&mut self, element: Element) -> &mut TextStyle {
        match element {
            Element::Title => &mut self.title,
            Element::Subtitle => &mut self.subtitle,
        }
    }

    /// Programmatic aspect override; rejects non-positive values.
    pub fn set_aspect(&mut self, aspect: f64) -> anyhow::Result<()> {
        if !aspect.is_finite() || aspect <= 0.0 {
            anyhow::bail!("aspect must be a positive number, got {aspect}");
        }
        self.aspect = aspect;
        Ok(())
    }

    /// Programmatic scale override; rejects non-positive values.
    pub fn set_scale(&mut self, element: Element, scale: f64) -> anyhow::Result<()> {
        if !scale.is_finite() || scale <= 0.0 {
            anyhow::bail!(
                "{}.scale must be a positive number, got {scale}",
                element.as_str()
            );
        }
        self.element_mut(element).scale = scale;
        Ok(())
    }
}

/// Pure reducer from the event list to the final style record.
pub fn fold_banner_style(events: &[BannerEvent]) -> (BannerStyle, Vec<Diagnostic>) {
    let mut style = BannerStyle::default();
    let mut diagnostics = Vec::new();

    for event in events {
        match event {
            BannerEvent::Background(background) => style.background = background.clone(),
            BannerEvent::Aspect(value) => style.aspect = *value,
            BannerEvent::PreserveAspect(mode) => style.preserve_aspect = Some(mode.clone()),
            BannerEvent::Font(font) => style.font = font.clone(),
            BannerEvent::TextColor(color) => style.text_color = color.clone(),
            BannerEvent::Color(element, color) => {
                style.element_mut(*element).color = Some(color.clone());
            }
            BannerEvent::Align { element, align, x, y } => {
                if let Some(x) = x {
                    if x != align.default_x() {
                        diagnostics.push(Diagnostic::warning(
                            Some("banner"),
                            format!(
                                "{}.align {} resolves x to {} but {} was given",
                                element.as_str(),
                                align.as_str(),
                                align.default_x(),
                                x
                            ),
                        ));
                    }
                }
                let target = style.element_mut(*element);
                target.align = Some(*align);
                target.align_x = x.clone();
                target.align_y = y.clone();
            }
            BannerEvent::Scale(element, value) => style.element_mut(*element).scale = *value,
            BannerEvent::Style(element, tokens) => {
                let target = style.element_mut(*element);
                for token in tokens {
                    match token.as_str() {
                        "bold" => target.bold = true,
                        "italic" => target.italic = true,
                        other => {
                            target.literal_style = Some(other.to_string());
                            diagnostics.push(Diagnostic::warning(
                                Some("banner"),
                                format!(
                                    "{}.style token '{}' is not bold/italic; using it as a literal font-style",
                                    element.as_str(),
                                    other
                                ),
                            ));
                        }
                    }
                }
            }
            BannerEvent::Xy(element, x, y) => {
                style.element_mut(*element).xy = Some((x.clone(), y.clone()));
            }
        }
    }

    // Advisory only when explicit coordinates actually shadow an alignment.
    for element in [Element::Title, Element::Subtitle] {
        let text = style.element(element);
        if text.xy.is_some() && text.align.is_some() {
            diagnostics.push(Diagnostic::warning(
                Some("banner"),
                format!(
                    "{}.xy overrides {}.align; the alignment has no effect on placement",
                    element.as_str(),
                    element.as_str()
                ),
            ));
        }
    }

    (style, diagnostics)
}

#[derive(Debug, Clone)]
pub struct BannerArt {
    pub svg: String,
    pub script: String,
}

pub fn render_banner(style: &BannerStyle, title: &str, subtitle: &str) -> BannerArt {
    let height = VIEW_WIDTH / style.aspect;
    let preserve = preserve_aspect_value(style);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg id=\"banner-svg\" xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {} {}\" width=\"100%\" preserveAspectRatio=\"{}\">\n",
        format_number(VIEW_WIDTH),
        format_number(height),
        preserve
    ));
    svg.push_str(&background_markup(style));
    if !title.is_empty() {
        svg.push_str(&text_markup(style, Element::Title, title));
    }
    if !subtitle.is_empty() {
        svg.push_str(&text_markup(style, Element::Subtitle, subtitle));
    }
    svg.push_str("</svg>\n");

    BannerArt {
        script: resize_script(style, title, subtitle),
        svg,
    }
}

fn preserve_aspect_value(style: &BannerStyle) -> String {
    match style.preserve_aspect.as_deref() {
        Some("meet") => "xMidYMid meet".to_string(),
        Some("slice") => "xMidYMid slice".to_string(),
        Some("none") => "none".to_string(),
        Some(other) => other.to_string(),
        None => {
            if matches!(style.background, Background::Radial { .. }) {
                "xMidYMid slice".to_string()
            } else {
                "xMidYMid meet".to_string()
            }
        }
    }
}

fn background_markup(style: &BannerStyle) -> String {
    match &style.background {
        Background::Solid(color) => format!(
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
            escape_attr(color)
        ),
        Background::Linear { start, end, direction } => {
            let (x1, y1, x2, y2) = direction.line();
            let mut out = String::new();
            out.push_str("<defs>\n");
            out.push_str(&format!(
                "<linearGradient id=\"banner-bg\" x1=\"{x1}\" y1=\"{y1}\" x2=\"{x2}\" y2=\"{y2}\">\n"
            ));
            out.push_str(&format!(
                "<stop offset=\"0%\" stop-color=\"{}\"/>\n",
                escape_attr(start)
            ));
            out.push_str(&format!(
                "<stop offset=\"100%\" stop-color=\"{}\"/>\n",
                escape_attr(end)
            ));
            out.push_str("</linearGradient>\n</defs>\n");
            out.push_str("<rect width=\"100%\" height=\"100%\" fill=\"url(#banner-bg)\"/>\n");
            out
        }
        Background::Radial {
            inner,
            outer,
            cx,
            cy,
            radius,
            compensation,
        } => {
            let comp = compensation.unwrap_or(1.0 / style.aspect);
            let mut out = String::new();
            out.push_str("<defs>\n");
            out.push_str(&format!(
                "<radialGradient id=\"banner-bg\" cx=\"{}\" cy=\"{}\" r=\"{}\" gradientTransform=\"scale({},1)\">\n",
                escape_attr(&compensate_cx(cx, comp)),
                escape_attr(cy),
                escape_attr(radius),
                format_number(comp)
            ));
            out.push_str(&format!(
                "<stop offset=\"0%\" stop-color=\"{}\"/>\n",
                escape_attr(inner)
            ));
            out.push_str(&format!(
                "<stop offset=\"100%\" stop-color=\"{}\"/>\n",
                escape_attr(outer)
            ));
            out.push_str("</radialGradient>\n</defs>\n");
            out.push_str("<rect width=\"100%\" height=\"100%\" fill=\"url(#banner-bg)\"/>\n");
            out
        }
        Background::Image(path) => format!(
            "<image href=\"{}\" width=\"100%\" height=\"100%\" preserveAspectRatio=\"xMidYMid slice\"/>\n",
            escape_attr(path)
        ),
    }
}

/// The gradient is squeezed horizontally by `comp`, so a percentage center
/// has to move the other way to stay visually in place.
fn compensate_cx(cx: &str, comp: f64) -> String {
    match cx.strip_suffix('%') {
        Some(number) => match number.trim().parse::<f64>() {
            Ok(value) => format!("{}%", format_number(value / comp)),
            Err(_) => cx.to_string(),
        },
        None => cx.to_string(),
    }
}

fn resolved_position(text: &TextStyle, element: Element) -> (String, String, &'static str) {
    let anchor = text.align.map(Align::anchor).unwrap_or("start");
    if let Some((x, y)) = &text.xy {
        return (x.clone(), y.clone(), anchor);
    }
    if let Some(align) = text.align {
        let x = text
            .align_x
            .clone()
            .unwrap_or_else(|| align.default_x().to_string());
        let y = text
            .align_y
            .clone()
            .unwrap_or_else(|| element.default_y().to_string());
        return (x, y, anchor);
    }
    (
        "5%".to_string(),
        element.default_y().to_string(),
        anchor,
    )
}

fn text_markup(style: &BannerStyle, element: Element, content: &str) -> String {
    let text = style.element(element);
    let (x, y, anchor) = resolved_position(text, element);
    let size = BASE_FONT_SIZE * text.scale;
    let weight = if text.bold { "bold" } else { "normal" };
    let font_style = text
        .literal_style
        .as_deref()
        .unwrap_or(if text.italic { "italic" } else { "normal" });
    let color = text.color.as_deref().unwrap_or(&style.text_color);
    format!(
        "<text id=\"{}\" x=\"{}\" y=\"{}\" text-anchor=\"{}\" font-family=\"{}\" font-size=\"{}px\" font-weight=\"{}\" font-style=\"{}\" fill=\"{}\">{}</text>\n",
        element.svg_id(),
        escape_attr(&x),
        escape_attr(&y),
        anchor,
        escape_attr(&style.font),
        format_number(size),
        weight,
        escape_attr(font_style),
        escape_attr(color),
        escape_html_text(content)
    )
}

/// Companion script: keeps the banner box at the configured aspect ratio and
/// re-derives the text coordinates from the same percentage values the static
/// SVG was rendered with.
fn resize_script(style: &BannerStyle, title: &str, subtitle: &str) -> String {
    let height = VIEW_WIDTH / style.aspect;
    let mut entries = Vec::new();
    for (element, content) in [(Element::Title, title), (Element::Subtitle, subtitle)] {
        if content.is_empty() {
            continue;
        }
        let text = style.element(element);
        let (x, y, _) = resolved_position(text, element);
        entries.push(format!(
            "    {{ id: '{}', x: '{}', y: '{}', size: {} }}",
            element.svg_id(),
            x,
            y,
            format_number(BASE_FONT_SIZE * text.scale)
        ));
    }

    let mut out = String::new();
    out.push_str("(function () {\n");
    out.push_str("  var root = document.getElementById('view-banner');\n");
    out.push_str("  var svg = document.getElementById('banner-svg');\n");
    out.push_str("  if (!root || !svg) { return; }\n");
    out.push_str(&format!(
        "  var aspect = {};\n",
        format_number(style.aspect)
    ));
    out.push_str(&format!(
        "  var baseWidth = {};\n",
        format_number(VIEW_WIDTH)
    ));
    out.push_str(&format!(
        "  var baseHeight = {};\n",
        format_number(height)
    ));
    out.push_str("  var texts = [\n");
    out.push_str(&entries.join(",\n"));
    out.push_str("\n  ];\n");
    out.push_str("  function toUnits(value, extent) {\n");
    out.push_str("    if (value.slice(-1) === '%') { return extent * parseFloat(value) / 100; }\n");
    out.push_str("    return parseFloat(value);\n");
    out.push_str("  }\n");
    out.push_str("  function layout() {\n");
    out.push_str("    var width = root.clientWidth;\n");
    out.push_str("    if (!width) { return; }\n");
    out.push_str("    root.style.height = (width / aspect) + 'px';\n");
    out.push_str("    for (var i = 0; i < texts.length; i++) {\n");
    out.push_str("      var el = document.getElementById(texts[i].id);\n");
    out.push_str("      if (!el) { continue; }\n");
    out.push_str("      el.setAttribute('x', toUnits(texts[i].x, baseWidth));\n");
    out.push_str("      el.setAttribute('y', toUnits(texts[i].y, baseHeight));\n");
    out.push_str("      el.setAttribute('font-size', texts[i].size + 'px');\n");
    out.push_str("    }\n");
    out.push_str("  }\n");
    out.push_str("  window.addEventListener('resize', layout);\n");
    out.push_str("  layout();\n");
    out.push_str("})();\n");
    out
}
