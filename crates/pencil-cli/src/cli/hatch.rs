//! Hatch command implementation.
//!
//! Fills a plain rectangle with hachure lines, either sketched or as the raw
//! clipped segments straight from the iterator.

use log::info;
use serde::Serialize;

use pencil::{HachureFill, HachureStyle, Path, Point, SketchConfig, Size, SvgDocument, SvgLayer};

use super::common::{
    CliError, JsonPath, OutputFormat, generate_png, parse_value, random_seed, take_value,
    validate_color, write_output,
};

/// A raw line in JSON output format.
#[derive(Serialize)]
struct JsonLine {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

#[derive(Serialize)]
struct JsonRawOutput {
    style: &'static str,
    lines: Vec<JsonLine>,
}

#[derive(Serialize)]
struct JsonSketchedOutput {
    style: &'static str,
    seed: u64,
    fill: JsonPath,
}

/// Execute the hatch command.
pub fn cmd_hatch(args: &[String]) -> Result<(), CliError> {
    let mut width = 200.0;
    let mut height = 100.0;
    let mut angle = pencil::fill::DEFAULT_ANGLE_DEGREES;
    let mut gap = pencil::fill::DEFAULT_GAP;
    let mut cross = false;
    let mut raw = false;
    let mut seed = 0u64;
    let mut config = SketchConfig::default();
    let mut stroke = "black".to_string();
    let mut stroke_width = 1.0;
    let mut format = OutputFormat::Svg;
    let mut output_path: Option<String> = None;
    let mut png_path: Option<String> = None;
    let mut png_scale = 2.0;

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-w" | "--width" => width = parse_value(flag, take_value(args, &mut i, flag)?)?,
            "--height" => height = parse_value(flag, take_value(args, &mut i, flag)?)?,
            "-a" | "--angle" => angle = parse_value(flag, take_value(args, &mut i, flag)?)?,
            "-g" | "--gap" => gap = parse_value(flag, take_value(args, &mut i, flag)?)?,
            "--crosshatch" => cross = true,
            "--raw" => raw = true,
            "--seed" => seed = parse_value(flag, take_value(args, &mut i, flag)?)?,
            "--random-seed" => seed = random_seed(),
            "--offset" => {
                config = config.with_max_lateral_offset(parse_value(flag, take_value(args, &mut i, flag)?)?);
            }
            "--step" => config = config.with_step_size(parse_value(flag, take_value(args, &mut i, flag)?)?),
            "--stroke" => stroke = take_value(args, &mut i, flag)?.to_string(),
            "--stroke-width" => stroke_width = parse_value(flag, take_value(args, &mut i, flag)?)?,
            "-f" | "--format" => format = OutputFormat::from_name(take_value(args, &mut i, flag)?)?,
            "--json" => format = OutputFormat::Json,
            "-o" | "--output" => output_path = Some(take_value(args, &mut i, flag)?.to_string()),
            "--png" => png_path = Some(take_value(args, &mut i, flag)?.to_string()),
            "--png-scale" => png_scale = parse_value(flag, take_value(args, &mut i, flag)?)?,
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            unknown => return Err(CliError::Usage(format!("Unknown option: {}", unknown))),
        }
        i += 1;
    }

    validate_color(&stroke)?;
    let size = Size::new(width, height);
    let style = if cross {
        HachureStyle::CrossHatch { angle_degrees: angle }
    } else {
        HachureStyle::Hatch { angle_degrees: angle }
    };
    let hachure = HachureFill::new(gap, style).with_seed(seed).with_config(config);

    let path = if raw {
        let lines = hachure.raw_lines(size)?;
        info!("Generated {} raw {} lines", lines.len(), style.name());
        if format == OutputFormat::Json {
            let json = JsonRawOutput {
                style: style.name(),
                lines: lines
                    .iter()
                    .map(|(a, b)| JsonLine { x1: a.x, y1: a.y, x2: b.x, y2: b.y })
                    .collect(),
            };
            return write_output(output_path.as_deref(), &serde_json::to_string_pretty(&json)?);
        }
        lines_to_path(&lines)
    } else {
        let path = hachure.fill(size)?;
        info!("Generated {} sketched {} lines", path.subpaths().len(), style.name());
        if format == OutputFormat::Json {
            let json = JsonSketchedOutput { style: style.name(), seed, fill: JsonPath::from(&path) };
            return write_output(output_path.as_deref(), &serde_json::to_string_pretty(&json)?);
        }
        path
    };

    let mut doc = SvgDocument::new(size);
    doc.push(SvgLayer::stroked(path, stroke, stroke_width));
    let svg = doc.to_svg_string()?;

    if let Some(png_path) = &png_path {
        generate_png(&svg, png_path, png_scale, size)?;
    }
    write_output(output_path.as_deref(), &svg)
}

/// One move-to/line-to pair per raw line.
fn lines_to_path(lines: &[(Point, Point)]) -> Path {
    let mut path = Path::with_capacity(lines.len() * 2);
    for (a, b) in lines {
        path.move_to(*a);
        path.line_to(*b);
    }
    path
}

fn print_usage() {
    eprintln!("Usage: pencil hatch [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -w, --width <px>        Region width (default: 200)");
    eprintln!("  --height <px>           Region height (default: 100)");
    eprintln!("  -a, --angle <deg>       Hachure angle (default: 45)");
    eprintln!("  -g, --gap <px>          Distance between lines (default: 8)");
    eprintln!("  --crosshatch            Add a second pass at angle + 90");
    eprintln!("  --raw                   Emit unsketched clipped segments");
    eprintln!("  --seed <n>              Random seed (default: 0)");
    eprintln!("  --random-seed           Pick a random seed and log it");
    eprintln!("  --offset <px>           Maximum lateral offset (default: 1.5)");
    eprintln!("  --step <px>             Sample spacing along lines (default: 2)");
    eprintln!("  --stroke <color>        Stroke color (default: black)");
    eprintln!("  --stroke-width <px>     Stroke width (default: 1)");
    eprintln!("  -f, --format <svg|json> Output format (default: svg)");
    eprintln!("  --json                  Same as --format json");
    eprintln!("  -o, --output <file>     Output file (default: stdout)");
    eprintln!("  --png <file>            Also render a PNG preview");
    eprintln!("  --png-scale <n>         PNG scale factor (default: 2)");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_lines_become_separate_subpaths() {
        let lines = vec![
            (Point::new(0.0, 0.0), Point::new(0.0, 10.0)),
            (Point::new(5.0, 0.0), Point::new(5.0, 10.0)),
        ];
        let path = lines_to_path(&lines);
        assert_eq!(path.subpaths().len(), 2);
        assert_eq!(path.to_svg_data(), "M0.00 0.00 L0.00 10.00 M5.00 0.00 L5.00 10.00");
    }
}
