//! SVG export - write sketched paths as a standalone SVG document.
//!
//! Every layer becomes one `<path>` element. Layers with a clip path get a
//! matching `<clipPath>` in `<defs>`, which is how hachure fills are kept
//! inside non-rectangular outlines.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use thiserror::Error;

use crate::geometry::{Path, Size};

/// Error type for SVG export.
#[derive(Debug, Error)]
pub enum SvgError {
    #[error("SVG write error: {0}")]
    Write(String),

    #[error("SVG output is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// One styled path in a document.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgLayer {
    pub path: Path,
    /// Stroke color, `None` for no stroke.
    pub stroke: Option<String>,
    pub stroke_width: f64,
    /// Fill color, `None` for no fill.
    pub fill: Option<String>,
    /// 0.0 to 1.0
    pub opacity: f64,
    /// Clip the layer to this path.
    pub clip: Option<Path>,
}

impl SvgLayer {
    /// Stroked, unfilled layer.
    pub fn stroked(path: Path, color: impl Into<String>, width: f64) -> Self {
        Self {
            path,
            stroke: Some(color.into()),
            stroke_width: width,
            fill: None,
            opacity: 1.0,
            clip: None,
        }
    }

    pub fn with_fill(mut self, color: impl Into<String>) -> Self {
        self.fill = Some(color.into());
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_clip(mut self, clip: Path) -> Self {
        self.clip = Some(clip);
        self
    }
}

/// A fixed-size SVG document made of stacked layers.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    size: Size,
    title: Option<String>,
    background: Option<String>,
    layers: Vec<SvgLayer>,
}

impl SvgDocument {
    pub fn new(size: Size) -> Self {
        Self { size, title: None, background: None, layers: Vec::new() }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    /// Add a layer on top of the existing ones. Empty paths are skipped.
    pub fn push(&mut self, layer: SvgLayer) {
        if !layer.path.is_empty() {
            self.layers.push(layer);
        }
    }

    pub fn layers(&self) -> &[SvgLayer] {
        &self.layers
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Serialize the whole document.
    pub fn to_svg_string(&self) -> Result<String, SvgError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(write_err)?;

        let width = format!("{}", self.size.width);
        let height = format!("{}", self.size.height);
        let view_box = format!("0 0 {} {}", self.size.width, self.size.height);
        let mut root = BytesStart::new("svg");
        root.push_attribute(("xmlns", "http://www.w3.org/2000/svg"));
        root.push_attribute(("width", width.as_str()));
        root.push_attribute(("height", height.as_str()));
        root.push_attribute(("viewBox", view_box.as_str()));
        writer.write_event(Event::Start(root)).map_err(write_err)?;

        if let Some(title) = &self.title {
            writer.write_event(Event::Start(BytesStart::new("title"))).map_err(write_err)?;
            writer.write_event(Event::Text(BytesText::new(title))).map_err(write_err)?;
            writer.write_event(Event::End(BytesEnd::new("title"))).map_err(write_err)?;
        }

        let clipped: Vec<(usize, &Path)> = self
            .layers
            .iter()
            .enumerate()
            .filter_map(|(index, layer)| layer.clip.as_ref().map(|clip| (index, clip)))
            .collect();

        if !clipped.is_empty() {
            writer.write_event(Event::Start(BytesStart::new("defs"))).map_err(write_err)?;
            for (index, clip) in &clipped {
                let id = clip_id(*index);
                let mut clip_path = BytesStart::new("clipPath");
                clip_path.push_attribute(("id", id.as_str()));
                writer.write_event(Event::Start(clip_path)).map_err(write_err)?;

                let data = clip.to_svg_data();
                let mut element = BytesStart::new("path");
                element.push_attribute(("d", data.as_str()));
                writer.write_event(Event::Empty(element)).map_err(write_err)?;

                writer.write_event(Event::End(BytesEnd::new("clipPath"))).map_err(write_err)?;
            }
            writer.write_event(Event::End(BytesEnd::new("defs"))).map_err(write_err)?;
        }

        if let Some(background) = &self.background {
            let mut rect = BytesStart::new("rect");
            rect.push_attribute(("width", "100%"));
            rect.push_attribute(("height", "100%"));
            rect.push_attribute(("fill", background.as_str()));
            writer.write_event(Event::Empty(rect)).map_err(write_err)?;
        }

        for (index, layer) in self.layers.iter().enumerate() {
            writer.write_event(Event::Empty(layer_element(index, layer))).map_err(write_err)?;
        }

        writer.write_event(Event::End(BytesEnd::new("svg"))).map_err(write_err)?;
        Ok(String::from_utf8(writer.into_inner())?)
    }
}

fn write_err<E: std::fmt::Display>(err: E) -> SvgError {
    SvgError::Write(err.to_string())
}

fn clip_id(index: usize) -> String {
    format!("clip-{}", index)
}

fn layer_element(index: usize, layer: &SvgLayer) -> BytesStart<'static> {
    let mut element = BytesStart::new("path");
    element.push_attribute(("d", layer.path.to_svg_data().as_str()));
    element.push_attribute(("fill", layer.fill.as_deref().unwrap_or("none")));
    match &layer.stroke {
        Some(stroke) => {
            element.push_attribute(("stroke", stroke.as_str()));
            element.push_attribute(("stroke-width", format!("{}", layer.stroke_width).as_str()));
            element.push_attribute(("stroke-linecap", "round"));
            element.push_attribute(("stroke-linejoin", "round"));
        }
        None => element.push_attribute(("stroke", "none")),
    }
    if layer.opacity < 1.0 {
        element.push_attribute(("opacity", format!("{}", layer.opacity.max(0.0)).as_str()));
    }
    if layer.clip.is_some() {
        element.push_attribute(("clip-path", format!("url(#{})", clip_id(index)).as_str()));
    }
    element
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn triangle() -> Path {
        let mut path = Path::new();
        path.move_to(Point::new(0.0, 0.0));
        path.line_to(Point::new(10.0, 0.0));
        path.line_to(Point::new(5.0, 8.0));
        path.close();
        path
    }

    #[test]
    fn writes_root_and_layers() {
        let mut doc = SvgDocument::new(Size::new(40.0, 20.0)).with_background("white");
        doc.push(SvgLayer::stroked(triangle(), "black", 1.5));
        let svg = doc.to_svg_string().unwrap();

        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(svg.contains("viewBox=\"0 0 40 20\""));
        assert!(svg.contains("<rect width=\"100%\" height=\"100%\" fill=\"white\"/>"));
        assert!(svg.contains("d=\"M0.00 0.00 L10.00 0.00 L5.00 8.00 Z\""));
        assert!(svg.contains("stroke=\"black\""));
        assert!(svg.contains("stroke-width=\"1.5\""));
        assert!(svg.contains("fill=\"none\""));
        assert!(!svg.contains("<defs>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn clipped_layers_reference_defs() {
        let mut doc = SvgDocument::new(Size::new(10.0, 10.0));
        doc.push(SvgLayer::stroked(triangle(), "black", 1.0));
        doc.push(SvgLayer::stroked(triangle(), "red", 0.5).with_clip(triangle()));
        let svg = doc.to_svg_string().unwrap();

        assert!(svg.contains("<clipPath id=\"clip-1\">"));
        assert!(svg.contains("clip-path=\"url(#clip-1)\""));
        assert!(!svg.contains("clip-0"));
    }

    #[test]
    fn empty_paths_are_skipped() {
        let mut doc = SvgDocument::new(Size::new(10.0, 10.0));
        doc.push(SvgLayer::stroked(Path::new(), "black", 1.0));
        assert!(doc.layers().is_empty());
    }

    #[test]
    fn title_and_opacity_are_written() {
        let mut doc = SvgDocument::new(Size::new(10.0, 10.0)).with_title("Sketch & Co");
        doc.push(SvgLayer::stroked(triangle(), "black", 1.0).with_opacity(0.5));
        doc.push(SvgLayer::stroked(triangle(), "black", 1.0));
        let svg = doc.to_svg_string().unwrap();
        assert!(svg.contains("<title>Sketch &amp; Co</title>"));
        assert_eq!(svg.matches("opacity=\"0.5\"").count(), 1);
    }

    #[test]
    fn attribute_values_are_escaped() {
        let mut doc = SvgDocument::new(Size::new(10.0, 10.0));
        doc.push(SvgLayer::stroked(triangle(), "a\"b<c", 1.0).with_fill("#ffeecc"));
        let svg = doc.to_svg_string().unwrap();
        assert!(svg.contains("stroke=\"a&quot;b&lt;c\""));
        assert!(svg.contains("fill=\"#ffeecc\""));
    }

    #[test]
    fn output_is_parseable_by_quick_xml() {
        use quick_xml::Reader;

        let mut doc = SvgDocument::new(Size::new(30.0, 30.0));
        doc.push(SvgLayer::stroked(triangle(), "blue", 2.0).with_clip(triangle()));
        let svg = doc.to_svg_string().unwrap();

        let mut reader = Reader::from_str(&svg);
        let mut paths = 0;
        loop {
            match reader.read_event().unwrap() {
                Event::Empty(e) if e.name().as_ref() == b"path" => paths += 1,
                Event::Eof => break,
                _ => {}
            }
        }
        assert_eq!(paths, 2);
    }
}
