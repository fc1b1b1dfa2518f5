//! Shape command implementation.

use log::{debug, info};
use serde::Serialize;

use pencil::{
    CornerSize, HachureFill, HachureStyle, LayoutDirection, Point, SketchConfig, Size, SvgDocument,
    SvgLayer,
};

use super::common::{
    CliError, JsonPath, OutputFormat, ShapeKind, ShapeParams, generate_png, parse_corner,
    parse_corners, parse_value, random_seed, take_value, validate_color, write_output,
};

/// JSON output for a single shape.
#[derive(Serialize)]
struct JsonShape {
    shape: &'static str,
    seed: u64,
    width: f64,
    height: f64,
    outline: JsonPath,
    #[serde(skip_serializing_if = "Option::is_none")]
    fill: Option<JsonPath>,
}

/// Options collected from the command line.
struct ShapeOptions {
    params: ShapeParams,
    size: Size,
    seed: u64,
    config: SketchConfig,
    density: f64,
    fill: Option<HachureStyle>,
    gap: f64,
    stroke: String,
    stroke_width: f64,
    fill_color: Option<String>,
    format: OutputFormat,
    output_path: Option<String>,
    png_path: Option<String>,
    png_scale: f64,
}

/// Execute the shape command.
pub fn cmd_shape(args: &[String]) -> Result<(), CliError> {
    let Some(kind_name) = args.first() else {
        print_usage();
        return Ok(());
    };
    if matches!(kind_name.as_str(), "-h" | "--help") {
        print_usage();
        return Ok(());
    }

    let kind = ShapeKind::from_name(kind_name).ok_or_else(|| {
        CliError::Usage(format!(
            "Unknown shape: {}. Use 'pencil shapes' to list available.",
            kind_name
        ))
    })?;

    let Some(options) = parse_options(kind, &args[1..])? else {
        return Ok(());
    };

    let margin = options.config.max_lateral_offset.abs() + options.stroke_width;
    let offset = Point::new(margin, margin);
    let canvas = Size::new(options.size.width + 2.0 * margin, options.size.height + 2.0 * margin);

    let outline = options.params.outline(options.seed, options.size, &options.config)?;
    debug!("{} outline has {} commands", kind.name(), outline.len());

    let fill = match options.fill {
        Some(style) => {
            let hachure = HachureFill::new(options.gap * options.density, style)
                .with_seed(options.seed)
                .with_config(options.config);
            Some(hachure.fill(options.size)?)
        }
        None => None,
    };

    let output = match options.format {
        OutputFormat::Json => serde_json::to_string_pretty(&JsonShape {
            shape: kind.name(),
            seed: options.seed,
            width: options.size.width,
            height: options.size.height,
            outline: JsonPath::from(&outline),
            fill: fill.as_ref().map(JsonPath::from),
        })?,
        OutputFormat::Svg => {
            let mut doc = SvgDocument::new(canvas);
            if let Some(fill) = &fill {
                let color = options.fill_color.as_deref().unwrap_or(&options.stroke);
                let mut layer = SvgLayer::stroked(fill.translate(offset), color, options.stroke_width / 2.0);
                if let Some(clip) = options.params.clip(options.size, &options.config)? {
                    layer = layer.with_clip(clip.translate(offset));
                }
                doc.push(layer);
            }
            doc.push(SvgLayer::stroked(
                outline.translate(offset),
                options.stroke.as_str(),
                options.stroke_width,
            ));
            doc.to_svg_string()?
        }
    };

    if let Some(png_path) = &options.png_path {
        let svg = match options.format {
            OutputFormat::Svg => output.clone(),
            OutputFormat::Json => {
                let mut doc = SvgDocument::new(canvas);
                doc.push(SvgLayer::stroked(outline.translate(offset), options.stroke.as_str(), options.stroke_width));
                doc.to_svg_string()?
            }
        };
        generate_png(&svg, png_path, options.png_scale, canvas)?;
    }

    info!("Sketched {} {}x{} with seed {}", kind.name(), options.size.width, options.size.height, options.seed);
    write_output(options.output_path.as_deref(), &output)
}

fn parse_options(kind: ShapeKind, args: &[String]) -> Result<Option<ShapeOptions>, CliError> {
    let mut params = ShapeParams::new(kind);
    let mut width: f64 = 120.0;
    let mut height: f64 = 60.0;
    let mut seed = 0u64;
    let mut use_random_seed = false;
    let mut config = SketchConfig::default();
    let mut density: f64 = 1.0;
    let mut fill = None;
    let mut angle = pencil::fill::DEFAULT_ANGLE_DEGREES;
    let mut gap = pencil::fill::DEFAULT_GAP;
    let mut stroke = "black".to_string();
    let mut stroke_width = 1.5;
    let mut fill_color = None;
    let mut format = OutputFormat::Svg;
    let mut output_path = None;
    let mut png_path = None;
    let mut png_scale = 2.0;

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-w" | "--width" => width = parse_value(flag, take_value(args, &mut i, flag)?)?,
            "--height" => height = parse_value(flag, take_value(args, &mut i, flag)?)?,
            "--seed" => seed = parse_value(flag, take_value(args, &mut i, flag)?)?,
            "--random-seed" => use_random_seed = true,
            "--offset" => {
                config = config.with_max_lateral_offset(parse_value(flag, take_value(args, &mut i, flag)?)?);
            }
            "--step" => config = config.with_step_size(parse_value(flag, take_value(args, &mut i, flag)?)?),
            "--arc-step" => {
                config = config.with_arc_step_degrees(parse_value(flag, take_value(args, &mut i, flag)?)?);
            }
            "--density" => density = parse_value(flag, take_value(args, &mut i, flag)?)?,
            "--radius" => params.corners = [parse_corner(flag, take_value(args, &mut i, flag)?)?; 4],
            "--radii" => params.corners = parse_corners(flag, take_value(args, &mut i, flag)?)?,
            "--start" => params.start_degrees = parse_value(flag, take_value(args, &mut i, flag)?)?,
            "--sweep" => params.sweep_degrees = parse_value(flag, take_value(args, &mut i, flag)?)?,
            "--rtl" => params.direction = LayoutDirection::Rtl,
            "--hatch" => fill = Some(false),
            "--crosshatch" => fill = Some(true),
            "--angle" => angle = parse_value(flag, take_value(args, &mut i, flag)?)?,
            "--gap" => gap = parse_value(flag, take_value(args, &mut i, flag)?)?,
            "--stroke" => stroke = take_value(args, &mut i, flag)?.to_string(),
            "--stroke-width" => stroke_width = parse_value(flag, take_value(args, &mut i, flag)?)?,
            "--fill-color" => fill_color = Some(take_value(args, &mut i, flag)?.to_string()),
            "-f" | "--format" => format = OutputFormat::from_name(take_value(args, &mut i, flag)?)?,
            "--json" => format = OutputFormat::Json,
            "-o" | "--output" => output_path = Some(take_value(args, &mut i, flag)?.to_string()),
            "--png" => png_path = Some(take_value(args, &mut i, flag)?.to_string()),
            "--png-scale" => png_scale = parse_value(flag, take_value(args, &mut i, flag)?)?,
            "-h" | "--help" => {
                print_usage();
                return Ok(None);
            }
            unknown => return Err(CliError::Usage(format!("Unknown option: {}", unknown))),
        }
        i += 1;
    }

    if !(width >= 0.0 && height >= 0.0 && width.is_finite() && height.is_finite()) {
        return Err(CliError::Usage("width and height must be finite and non-negative".to_string()));
    }
    if !(density > 0.0 && density.is_finite()) {
        return Err(CliError::InvalidValue { flag: "--density".to_string(), value: density.to_string() });
    }
    validate_color(&stroke)?;
    if let Some(color) = &fill_color {
        validate_color(color)?;
    }
    config.validate()?;

    if use_random_seed {
        seed = random_seed();
    }

    // Every length is given in dp
    params.corners = params.corners.map(|corner| match corner {
        CornerSize::Pixels(px) => CornerSize::Pixels(px * density),
        percent => percent,
    });

    let fill = fill.map(|cross| {
        if cross {
            HachureStyle::CrossHatch { angle_degrees: angle }
        } else {
            HachureStyle::Hatch { angle_degrees: angle }
        }
    });

    Ok(Some(ShapeOptions {
        params,
        size: Size::new(width * density, height * density),
        seed,
        config: config.to_pixels(density),
        density,
        fill,
        gap,
        stroke,
        stroke_width,
        fill_color,
        format,
        output_path,
        png_path,
        png_scale,
    }))
}

/// Execute the shapes command: list every shape name.
pub fn cmd_shapes() -> Result<(), CliError> {
    println!("Available shapes:");
    for kind in ShapeKind::all() {
        println!("  {:<10} {}", kind.name(), kind.description());
    }
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: pencil shape <kind> [options]");
    eprintln!();
    eprintln!("Kinds: rectangle, circle, arc, capsule, rounded, vline, hline, line");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -w, --width <dp>        Region width (default: 120)");
    eprintln!("  --height <dp>           Region height (default: 60)");
    eprintln!("  --seed <n>              Random seed (default: 0)");
    eprintln!("  --random-seed           Pick a random seed and log it");
    eprintln!("  --offset <dp>           Maximum lateral offset (default: 1.5)");
    eprintln!("  --step <dp>             Sample spacing along lines (default: 2)");
    eprintln!("  --arc-step <deg>        Sample spacing along arcs (default: 5)");
    eprintln!("  --density <n>           Pixels per dp (default: 1)");
    eprintln!("  --radius <dp|n%>        Corner radius for 'rounded'");
    eprintln!("  --radii <a,b,c,d>       Per-corner radii: top-start,top-end,bottom-end,bottom-start");
    eprintln!("  --start <deg>           Arc start angle (default: -90)");
    eprintln!("  --sweep <deg>           Arc sweep (default: 360)");
    eprintln!("  --rtl                   Right-to-left layout (swaps start/end corners)");
    eprintln!("  --hatch                 Add a hachure fill");
    eprintln!("  --crosshatch            Add a cross-hatched fill");
    eprintln!("  --angle <deg>           Hachure angle (default: 45)");
    eprintln!("  --gap <dp>              Hachure gap (default: 8)");
    eprintln!("  --stroke <color>        Stroke color (default: black)");
    eprintln!("  --stroke-width <px>     Stroke width (default: 1.5)");
    eprintln!("  --fill-color <color>    Hachure color (default: stroke color)");
    eprintln!("  -f, --format <svg|json> Output format (default: svg)");
    eprintln!("  --json                  Same as --format json");
    eprintln!("  -o, --output <file>     Output file (default: stdout)");
    eprintln!("  --png <file>            Also render a PNG preview");
    eprintln!("  --png-scale <n>         PNG scale factor (default: 2)");
}
