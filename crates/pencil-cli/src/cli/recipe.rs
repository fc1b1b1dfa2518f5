//! Sketch recipe system for declarative scene composition.
//!
//! Recipes are YAML files that place sketched shapes on a canvas.
//! Each layer specifies a shape, its box, an optional hachure fill and
//! styling. Layers render bottom to top.

use std::fs;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use pencil::{
    CornerSize, HachureFill, HachureStyle, LayoutDirection, Point, SketchConfig, Size, SvgDocument,
    SvgLayer,
};

use super::common::{
    CliError, ShapeKind, ShapeParams, generate_png, parse_corner, parse_value, take_value,
    validate_color, write_output,
};

/// A complete recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Recipe name/title
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Canvas configuration
    pub canvas: Canvas,

    /// Base seed. Layer `i` without its own seed uses `seed + i`.
    #[serde(default)]
    pub seed: u64,

    /// Pixels per dp for every sketch length
    #[serde(default = "default_density")]
    pub density: f64,

    /// Sketch tunables shared by all layers (in dp)
    #[serde(default)]
    pub sketch: SketchConfig,

    /// Default style applied to all layers (can be overridden)
    #[serde(default)]
    pub defaults: LayerStyle,

    /// Ordered list of layers (rendered bottom to top)
    pub layers: Vec<Layer>,
}

fn default_density() -> f64 {
    1.0
}

/// Canvas/output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Canvas {
    /// Width in dp
    pub width: f64,

    /// Height in dp
    pub height: f64,

    /// Background color (default: white)
    #[serde(default = "default_background")]
    pub background: String,
}

fn default_background() -> String {
    "white".to_string()
}

/// A corner radius in YAML: a number of dp, or a string like `"25%"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CornerValue {
    Pixels(f64),
    Text(String),
}

impl CornerValue {
    fn to_corner(&self) -> Result<CornerSize, CliError> {
        match self {
            CornerValue::Pixels(px) => Ok(CornerSize::Pixels(*px)),
            CornerValue::Text(text) => parse_corner("radius", text),
        }
    }
}

/// A single sketched shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    /// Layer name (for identification)
    pub name: String,

    /// Shape kind (e.g., "rectangle", "capsule", "arc")
    pub shape: String,

    /// Top-left corner of the shape's box (dp)
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,

    /// Box size (dp)
    pub width: f64,
    pub height: f64,

    /// Seed override
    #[serde(default)]
    pub seed: Option<u64>,

    /// Uniform corner radius for `rounded`
    #[serde(default)]
    pub radius: Option<CornerValue>,

    /// Per-corner radii: top-start, top-end, bottom-end, bottom-start
    #[serde(default)]
    pub radii: Option<[CornerValue; 4]>,

    /// Arc start angle (degrees)
    #[serde(default)]
    pub start: Option<f64>,

    /// Arc sweep (degrees)
    #[serde(default)]
    pub sweep: Option<f64>,

    /// Right-to-left layout
    #[serde(default)]
    pub rtl: bool,

    /// Sketch tunables for this layer only
    #[serde(default)]
    pub sketch: Option<SketchConfig>,

    /// Optional hachure fill inside the shape
    #[serde(default)]
    pub hachure: Option<HachureParams>,

    /// Layer style (merged with defaults)
    #[serde(default)]
    pub style: LayerStyle,

    /// Whether this layer is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Hachure fill settings for a layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HachureParams {
    /// Distance between lines (dp)
    #[serde(default = "default_gap")]
    pub gap: f64,

    /// Line angle (degrees)
    #[serde(default = "default_angle")]
    pub angle: f64,

    /// "hatch" or "crosshatch"
    #[serde(default = "default_hachure_style")]
    pub style: String,

    /// Line color (default: the layer's stroke color)
    #[serde(default)]
    pub color: Option<String>,
}

fn default_gap() -> f64 {
    pencil::fill::DEFAULT_GAP
}

fn default_angle() -> f64 {
    pencil::fill::DEFAULT_ANGLE_DEGREES
}

fn default_hachure_style() -> String {
    "hatch".to_string()
}

/// Style properties for a layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerStyle {
    /// Stroke color
    #[serde(default)]
    pub color: Option<String>,

    /// Stroke width
    #[serde(default)]
    pub stroke_width: Option<f64>,

    /// Opacity (0.0 to 1.0)
    #[serde(default)]
    pub opacity: Option<f64>,
}

impl LayerStyle {
    /// Merge this style with defaults, preferring self's values.
    pub fn merge_with(&self, defaults: &LayerStyle) -> LayerStyle {
        LayerStyle {
            color: self.color.clone().or_else(|| defaults.color.clone()),
            stroke_width: self.stroke_width.or(defaults.stroke_width),
            opacity: self.opacity.or(defaults.opacity),
        }
    }

    /// Get color with fallback.
    pub fn color_or(&self, fallback: &str) -> String {
        self.color.clone().unwrap_or_else(|| fallback.to_string())
    }

    /// Get stroke width with fallback.
    pub fn stroke_width_or(&self, fallback: f64) -> f64 {
        self.stroke_width.unwrap_or(fallback)
    }

    /// Get opacity with fallback.
    pub fn opacity_or(&self, fallback: f64) -> f64 {
        self.opacity.unwrap_or(fallback)
    }
}

impl Layer {
    fn params(&self, kind: ShapeKind) -> Result<ShapeParams, CliError> {
        let mut params = ShapeParams::new(kind);
        if let Some(radius) = &self.radius {
            params.corners = [radius.to_corner()?; 4];
        }
        if let Some(radii) = &self.radii {
            params.corners = [
                radii[0].to_corner()?,
                radii[1].to_corner()?,
                radii[2].to_corner()?,
                radii[3].to_corner()?,
            ];
        }
        if let Some(start) = self.start {
            params.start_degrees = start;
        }
        if let Some(sweep) = self.sweep {
            params.sweep_degrees = sweep;
        }
        if self.rtl {
            params.direction = LayoutDirection::Rtl;
        }
        Ok(params)
    }
}

impl Recipe {
    /// Load a recipe from a YAML file.
    pub fn load(path: &str) -> Result<Self, CliError> {
        let content = fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, CliError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Render every enabled layer into one document.
    ///
    /// Unknown shapes are skipped with a warning; bad colors and invalid
    /// sketch settings fail the whole recipe.
    pub fn render(&self) -> Result<SvgDocument, CliError> {
        validate_color(&self.canvas.background)?;
        let size = Size::new(self.canvas.width * self.density, self.canvas.height * self.density);
        let mut doc = SvgDocument::new(size)
            .with_title(self.name.as_str())
            .with_background(self.canvas.background.as_str());

        for (index, layer) in self.layers.iter().enumerate() {
            if !layer.enabled {
                continue;
            }

            let Some(kind) = ShapeKind::from_name(&layer.shape) else {
                warn!("Unknown shape '{}', skipping layer '{}'", layer.shape, layer.name);
                continue;
            };

            let style = layer.style.merge_with(&self.defaults);
            let color = style.color_or("black");
            let stroke_width = style.stroke_width_or(1.0);
            let opacity = style.opacity_or(1.0);
            validate_color(&color)?;

            let seed = layer.seed.unwrap_or(self.seed.wrapping_add(index as u64));
            let config = layer.sketch.unwrap_or(self.sketch).to_pixels(self.density);
            let mut params = layer.params(kind)?;
            params.corners = params.corners.map(|corner| match corner {
                CornerSize::Pixels(px) => CornerSize::Pixels(px * self.density),
                percent => percent,
            });

            let origin = Point::new(layer.x, layer.y) * self.density;
            let box_size = Size::new(layer.width * self.density, layer.height * self.density);

            if let Some(hachure) = &layer.hachure {
                let style = HachureStyle::from_name(&hachure.style, hachure.angle).ok_or_else(|| {
                    CliError::Usage(format!(
                        "Unknown hachure style '{}' in layer '{}'",
                        hachure.style, layer.name
                    ))
                })?;
                let fill_color = hachure.color.clone().unwrap_or_else(|| color.clone());
                validate_color(&fill_color)?;

                let fill = HachureFill::new(hachure.gap * self.density, style)
                    .with_seed(seed)
                    .with_config(config)
                    .fill(box_size)?;
                let mut fill_layer = SvgLayer::stroked(fill.translate(origin), fill_color, stroke_width / 2.0)
                    .with_opacity(opacity);
                if let Some(clip) = params.clip(box_size, &config)? {
                    fill_layer = fill_layer.with_clip(clip.translate(origin));
                }
                doc.push(fill_layer);
            }

            let outline = params.outline(seed, box_size, &config)?;
            doc.push(
                SvgLayer::stroked(outline.translate(origin), color, stroke_width).with_opacity(opacity),
            );
            info!("Layer '{}': {} with seed {}", layer.name, kind.name(), seed);
        }

        Ok(doc)
    }
}

/// Execute the recipe command.
pub fn cmd_recipe(args: &[String]) -> Result<(), CliError> {
    if args.is_empty() {
        print_usage();
        return Ok(());
    }

    let mut recipe_path: Option<String> = None;
    let mut output_path: Option<String> = None;
    let mut png_path: Option<String> = None;
    let mut png_scale = 1.0;

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-o" | "--output" => output_path = Some(take_value(args, &mut i, flag)?.to_string()),
            "--png" => png_path = Some(take_value(args, &mut i, flag)?.to_string()),
            "--png-scale" => png_scale = parse_value(flag, take_value(args, &mut i, flag)?)?,
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            "--example" => {
                print_example();
                return Ok(());
            }
            arg if !arg.starts_with('-') => {
                recipe_path = Some(arg.to_string());
            }
            unknown => return Err(CliError::Usage(format!("Unknown option: {}", unknown))),
        }
        i += 1;
    }

    let recipe_path =
        recipe_path.ok_or_else(|| CliError::Usage("No recipe file specified".to_string()))?;

    info!("Loading recipe: {}", recipe_path);
    let recipe = Recipe::load(&recipe_path)?;

    info!("Recipe: {}", recipe.name);
    info!("Canvas: {} x {}", recipe.canvas.width, recipe.canvas.height);
    info!("Layers: {}", recipe.layers.len());

    let doc = recipe.render()?;
    let svg = doc.to_svg_string()?;

    if let Some(png_path) = &png_path {
        generate_png(&svg, png_path, png_scale, doc.size())?;
    }
    write_output(output_path.as_deref(), &svg)
}

fn print_usage() {
    eprintln!("pencil recipe - Render sketched scenes from YAML");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    pencil recipe <recipe.yaml> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -o, --output <file>    Output SVG file (default: stdout)");
    eprintln!("    --png <file>           Also render a PNG");
    eprintln!("    --png-scale <n>        PNG scale factor (default: 1)");
    eprintln!("    --example              Print an example recipe YAML");
    eprintln!("    -h, --help             Show this help");
    eprintln!();
    eprintln!("EXAMPLE:");
    eprintln!("    pencil recipe card.yaml -o card.svg --png card.png");
}

/// Example recipe, also used by the tests.
pub const EXAMPLE_RECIPE: &str = r##"# Example pencil recipe
name: "Sketched Card"
description: "A card with a progress ring and a divider"

canvas:
  width: 320
  height: 200
  background: "white"

seed: 7
density: 1.0

sketch:
  max_lateral_offset: 1.5
  step_size: 2.0
  arc_step_degrees: 5.0

defaults:
  color: "#333333"
  stroke_width: 1.5

layers:
  - name: card
    shape: rounded
    x: 10
    y: 10
    width: 300
    height: 180
    radius: 16
    hachure:
      gap: 10
      angle: 45
      style: hatch
      color: "#bbbbbb"

  - name: progress
    shape: arc
    x: 30
    y: 40
    width: 80
    height: 80
    start: -90
    sweep: 270
    style:
      color: "#cc3300"
      stroke_width: 2.5

  - name: button
    shape: capsule
    x: 150
    y: 60
    width: 130
    height: 40
    hachure:
      style: crosshatch
      gap: 6
      angle: 30

  - name: divider
    shape: hline
    x: 30
    y: 140
    width: 260
    height: 10
    style:
      opacity: 0.6
"##;

fn print_example() {
    println!("{}", EXAMPLE_RECIPE);
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_recipe_parses_and_renders() {
        let recipe = Recipe::from_yaml(EXAMPLE_RECIPE).unwrap();
        assert_eq!(recipe.layers.len(), 4);
        assert_eq!(recipe.seed, 7);
        assert_eq!(recipe.layers[0].radius, Some(CornerValue::Pixels(16.0)));

        let doc = recipe.render().unwrap();
        // Two fills plus four outlines
        assert_eq!(doc.layers().len(), 6);
        let clipped = doc.layers().iter().filter(|layer| layer.clip.is_some()).count();
        assert_eq!(clipped, 2);

        let svg = doc.to_svg_string().unwrap();
        assert!(svg.contains("<title>Sketched Card</title>"));
        assert!(svg.contains("stroke=\"#cc3300\""));
    }

    #[test]
    fn rendering_is_deterministic() {
        let recipe = Recipe::from_yaml(EXAMPLE_RECIPE).unwrap();
        assert_eq!(recipe.render().unwrap(), recipe.render().unwrap());
    }

    #[test]
    fn style_merges_with_defaults() {
        let defaults = LayerStyle {
            color: Some("red".to_string()),
            stroke_width: Some(2.0),
            opacity: None,
        };
        let style = LayerStyle { color: None, stroke_width: Some(0.5), opacity: Some(0.3) };
        let merged = style.merge_with(&defaults);
        assert_eq!(merged.color_or("black"), "red");
        assert_eq!(merged.stroke_width_or(1.0), 0.5);
        assert_eq!(merged.opacity_or(1.0), 0.3);
    }

    #[test]
    fn percent_radius_and_unknown_shapes() {
        let yaml = r#"
name: test
canvas: { width: 100, height: 100 }
layers:
  - { name: a, shape: rounded, width: 80, height: 40, radius: "50%" }
  - { name: b, shape: hexagon, width: 10, height: 10 }
  - { name: c, shape: circle, width: 10, height: 10, enabled: false }
"#;
        let recipe = Recipe::from_yaml(yaml).unwrap();
        assert_eq!(recipe.layers[0].radius, Some(CornerValue::Text("50%".to_string())));
        let doc = recipe.render().unwrap();
        assert_eq!(doc.layers().len(), 1);
    }

    #[test]
    fn bad_colors_fail_the_recipe() {
        let yaml = r#"
name: test
canvas: { width: 10, height: 10 }
layers:
  - { name: a, shape: circle, width: 10, height: 10, style: { color: notacolor } }
"#;
        let recipe = Recipe::from_yaml(yaml).unwrap();
        assert!(matches!(recipe.render(), Err(CliError::Color(_))));
    }

    #[test]
    fn per_layer_sketch_overrides_recipe() {
        let yaml = r#"
name: test
canvas: { width: 50, height: 50 }
sketch: { step_size: 0 }
layers:
  - { name: a, shape: rectangle, width: 40, height: 40, sketch: { max_lateral_offset: 0 } }
"#;
        let recipe = Recipe::from_yaml(yaml).unwrap();
        // The layer's own config has the default step size, so it renders
        let doc = recipe.render().unwrap();
        for p in doc.layers()[0].path.points() {
            let on_edge = p.x.abs() < 1e-9 || (p.x - 40.0).abs() < 1e-9 || p.y.abs() < 1e-9 || (p.y - 40.0).abs() < 1e-9;
            assert!(on_edge);
        }
    }

    #[test]
    fn density_scales_canvas_and_boxes() {
        let yaml = r#"
name: test
canvas: { width: 50, height: 30 }
density: 2
sketch: { max_lateral_offset: 0 }
layers:
  - { name: a, shape: rectangle, x: 5, y: 5, width: 20, height: 10 }
"#;
        let doc = Recipe::from_yaml(yaml).unwrap().render().unwrap();
        assert_eq!(doc.size(), Size::new(100.0, 60.0));
        let bounds = doc.layers()[0].path.bounding_box().unwrap();
        assert!((bounds.left - 10.0).abs() < 1e-9 && (bounds.top - 10.0).abs() < 1e-9);
        assert!((bounds.right - 50.0).abs() < 1e-9 && (bounds.bottom - 30.0).abs() < 1e-9);
    }
}
