//! Common utilities shared across CLI commands.

use std::fs;
use std::str::FromStr;

use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

use pencil::{
    CornerSize, LayoutDirection, Path, Point, RandomSource, SketchConfig, SketchError, SketchShape,
    Size, SvgError, sketch_line_between, sketch_partial_circle,
};

/// Everything a command can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Sketch(#[from] SketchError),

    #[error(transparent)]
    Svg(#[from] SvgError),

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse recipe YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PNG rendering failed: {0}")]
    Render(String),

    #[error("invalid value '{value}' for {flag}")]
    InvalidValue { flag: String, value: String },

    #[error("unknown color '{0}'")]
    Color(String),

    #[error("{0}")]
    Usage(String),
}

impl CliError {
    pub fn io(path: &str, source: std::io::Error) -> Self {
        CliError::Io { path: path.to_string(), source }
    }
}

/// Output format for generated paths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Svg,
    Json,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Result<Self, CliError> {
        match name.to_lowercase().as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "json" => Ok(OutputFormat::Json),
            other => Err(CliError::Usage(format!("Unknown format: {}. Use 'svg' or 'json'.", other))),
        }
    }
}

// ============================================================================
// ARGUMENTS
// ============================================================================

/// Advance past a flag and return its value.
pub fn take_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, CliError> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| CliError::Usage(format!("{} requires a value", flag)))
}

/// Parse a flag value, naming the flag on failure.
pub fn parse_value<T: FromStr>(flag: &str, value: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
    })
}

/// `12` is pixels, `25%` is a share of the shape's smaller side.
pub fn parse_corner(flag: &str, value: &str) -> Result<CornerSize, CliError> {
    match value.strip_suffix('%') {
        Some(percent) => Ok(CornerSize::Percent(parse_value(flag, percent.trim())?)),
        None => Ok(CornerSize::Pixels(parse_value(flag, value)?)),
    }
}

/// Four comma-separated corners: top-start, top-end, bottom-end, bottom-start.
pub fn parse_corners(flag: &str, value: &str) -> Result<[CornerSize; 4], CliError> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(CliError::InvalidValue { flag: flag.to_string(), value: value.to_string() });
    }
    Ok([
        parse_corner(flag, parts[0])?,
        parse_corner(flag, parts[1])?,
        parse_corner(flag, parts[2])?,
        parse_corner(flag, parts[3])?,
    ])
}

/// Reject anything an SVG renderer would not understand as a color.
pub fn validate_color(color: &str) -> Result<(), CliError> {
    svgtypes::Color::from_str(color)
        .map(|_| ())
        .map_err(|_| CliError::Color(color.to_string()))
}

/// Fresh seed for `--random-seed`. Logged so the output can be reproduced.
pub fn random_seed() -> u64 {
    let seed = rand::random::<u64>();
    info!("Using random seed {}", seed);
    seed
}

// ============================================================================
// SHAPES
// ============================================================================

/// Every shape the CLI can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Arc,
    Capsule,
    Rounded,
    VerticalLine,
    HorizontalLine,
    Line,
}

impl ShapeKind {
    pub fn all() -> &'static [ShapeKind] {
        &[
            ShapeKind::Rectangle,
            ShapeKind::Circle,
            ShapeKind::Arc,
            ShapeKind::Capsule,
            ShapeKind::Rounded,
            ShapeKind::VerticalLine,
            ShapeKind::HorizontalLine,
            ShapeKind::Line,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Arc => "arc",
            ShapeKind::Capsule => "capsule",
            ShapeKind::Rounded => "rounded",
            ShapeKind::VerticalLine => "vline",
            ShapeKind::HorizontalLine => "hline",
            ShapeKind::Line => "line",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Closed rectangle",
            ShapeKind::Circle => "Circle inscribed in the box",
            ShapeKind::Arc => "Partial circle from --start, sweeping --sweep degrees",
            ShapeKind::Capsule => "Stadium; a circle when not wider than tall",
            ShapeKind::Rounded => "Rectangle with --radius or --radii corners",
            ShapeKind::VerticalLine => "Vertical divider through the middle",
            ShapeKind::HorizontalLine => "Horizontal divider through the middle",
            ShapeKind::Line => "Diagonal from top-left to bottom-right",
        }
    }

    pub fn from_name(name: &str) -> Option<ShapeKind> {
        match name.to_lowercase().as_str() {
            "rectangle" | "rect" => Some(ShapeKind::Rectangle),
            "circle" => Some(ShapeKind::Circle),
            "arc" | "progress" => Some(ShapeKind::Arc),
            "capsule" | "stadium" | "pill" => Some(ShapeKind::Capsule),
            "rounded" | "rounded-rectangle" => Some(ShapeKind::Rounded),
            "vline" | "vertical" => Some(ShapeKind::VerticalLine),
            "hline" | "horizontal" | "divider" => Some(ShapeKind::HorizontalLine),
            "line" => Some(ShapeKind::Line),
            _ => None,
        }
    }

    /// Whether the outline encloses an area a hachure fill can go into.
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            ShapeKind::Rectangle | ShapeKind::Circle | ShapeKind::Capsule | ShapeKind::Rounded
        )
    }
}

/// Everything needed to sketch one shape in a region at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeParams {
    pub kind: ShapeKind,
    /// top-start, top-end, bottom-end, bottom-start
    pub corners: [CornerSize; 4],
    pub start_degrees: f64,
    pub sweep_degrees: f64,
    pub direction: LayoutDirection,
}

impl ShapeParams {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            corners: [CornerSize::ZERO; 4],
            start_degrees: -90.0,
            sweep_degrees: 360.0,
            direction: LayoutDirection::Ltr,
        }
    }

    fn catalogue_shape(&self) -> Option<SketchShape> {
        let [top_start, top_end, bottom_end, bottom_start] = self.corners;
        match self.kind {
            ShapeKind::Rectangle => Some(SketchShape::Rectangle),
            ShapeKind::Circle => Some(SketchShape::Circle),
            ShapeKind::Capsule => Some(SketchShape::Capsule),
            ShapeKind::Rounded => Some(SketchShape::RoundedCorners {
                top_start,
                top_end,
                bottom_end,
                bottom_start,
            }),
            ShapeKind::VerticalLine => Some(SketchShape::VerticalLine),
            ShapeKind::HorizontalLine => Some(SketchShape::HorizontalLine),
            ShapeKind::Arc | ShapeKind::Line => None,
        }
    }

    /// Sketched outline spanning `(0, 0)` to `size`.
    pub fn outline(&self, seed: u64, size: Size, config: &SketchConfig) -> Result<Path, CliError> {
        if let Some(shape) = self.catalogue_shape() {
            return Ok(shape.outline(seed, size, self.direction, config)?);
        }
        let mut random = RandomSource::new(seed);
        let path = match self.kind {
            ShapeKind::Arc => sketch_partial_circle(
                &mut random,
                Point::ZERO,
                size.corner(),
                self.start_degrees,
                self.sweep_degrees,
                config,
            )?,
            _ => sketch_line_between(&mut random, Point::ZERO, size.corner(), config)?,
        };
        Ok(path)
    }

    /// Wobble-free outline to clip fills against, for closed shapes.
    pub fn clip(&self, size: Size, config: &SketchConfig) -> Result<Option<Path>, CliError> {
        if !self.kind.is_closed() {
            warn!("{} is not a closed shape, fill is left unclipped", self.kind.name());
            return Ok(None);
        }
        match self.catalogue_shape() {
            Some(shape) => Ok(Some(shape.simplified_outline(size, self.direction, config)?)),
            None => Ok(None),
        }
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

/// A point in JSON output format.
#[derive(Debug, Serialize)]
pub struct JsonPoint {
    pub x: f64,
    pub y: f64,
}

/// A path in JSON output format: one point list per subpath.
#[derive(Debug, Serialize)]
pub struct JsonPath {
    pub closed: bool,
    pub subpaths: Vec<Vec<JsonPoint>>,
}

impl From<&Path> for JsonPath {
    fn from(path: &Path) -> Self {
        JsonPath {
            closed: path.is_closed(),
            subpaths: path
                .subpaths()
                .into_iter()
                .map(|points| points.into_iter().map(|p| JsonPoint { x: p.x, y: p.y }).collect())
                .collect(),
        }
    }
}

/// Write to a file, or to stdout for `None` and `-`.
pub fn write_output(output_path: Option<&str>, content: &str) -> Result<(), CliError> {
    match output_path {
        Some("-") | None => {
            println!("{}", content);
        }
        Some(path) => {
            fs::write(path, content).map_err(|e| CliError::io(path, e))?;
            info!("Wrote: {}", path);
        }
    }
    Ok(())
}

/// Rasterize an SVG document to PNG on a white background.
pub fn generate_png(svg_content: &str, png_path: &str, scale: f64, size: Size) -> Result<(), CliError> {
    use resvg::usvg;
    use tiny_skia::Pixmap;

    info!("Generating PNG at {}x scale", scale);

    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg_content, &options).map_err(|e| CliError::Render(e.to_string()))?;

    let pixmap_width = (size.width * scale).ceil().max(1.0) as u32;
    let pixmap_height = (size.height * scale).ceil().max(1.0) as u32;

    let mut pixmap = Pixmap::new(pixmap_width, pixmap_height)
        .ok_or_else(|| CliError::Render("could not create pixmap".to_string()))?;

    pixmap.fill(tiny_skia::Color::WHITE);

    let transform = tiny_skia::Transform::from_scale(scale as f32, scale as f32);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap.save_png(png_path).map_err(|e| CliError::Render(e.to_string()))?;
    info!("Wrote: {} ({}x{})", png_path, pixmap_width, pixmap_height);
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
