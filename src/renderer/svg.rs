//! SVG document assembly for a rendered map

use crate::options::MapStyle;

use super::SvgConfig;

/// Id of the sphere path in `<defs>`
pub const SPHERE_ID: &str = "sphere";

/// Id of the clip path built from the sphere
pub const CLIP_ID: &str = "clip";

/// Build a map document incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    defs: Vec<String>,
    elements: Vec<String>,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            defs: vec![],
            elements: vec![],
        }
    }

    fn indent_str(&self, depth: usize) -> String {
        if self.config.pretty_print {
            "  ".repeat(depth)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    /// Define the globe outline and the clip path that references it
    pub fn add_sphere(&mut self, d: &str) {
        self.defs
            .push(format!(r#"<path id="{SPHERE_ID}" d="{}"/>"#, d));
        self.defs.push(format!(
            r##"<clipPath id="{CLIP_ID}"><use href="#{SPHERE_ID}" xlink:href="#{SPHERE_ID}"/></clipPath>"##
        ));
    }

    /// Fill and outline the globe
    pub fn add_background(&mut self, style: &MapStyle) {
        self.elements.push(format!(
            r##"{}<use class="background" href="#{SPHERE_ID}" xlink:href="#{SPHERE_ID}" fill="{}" stroke="{}" stroke-width="{}"/>"##,
            self.indent_str(1),
            escape_xml(&style.background_color),
            escape_xml(&style.outline_color),
            style.outline_thickness
        ));
    }

    /// Add the graticule as a thin dashed gray line
    pub fn add_graticule(&mut self, d: &str) {
        self.elements.push(format!(
            r#"{}<path class="graticule" d="{}" clip-path="url(#{CLIP_ID})" fill="none" stroke="gray" stroke-width="0.5" stroke-dasharray="2,2"/>"#,
            self.indent_str(1),
            d
        ));
    }

    /// Add one dataset path; later datasets are drawn over earlier ones
    pub fn add_dataset(&mut self, name: &str, d: &str, style: &MapStyle) {
        self.elements.push(format!(
            r#"{}<path class="dataset" data-name="{}" d="{}" clip-path="url(#{CLIP_ID})" fill="none" stroke="{}" stroke-width="{}"/>"#,
            self.indent_str(1),
            escape_xml(name),
            d,
            escape_xml(&style.line_color),
            style.line_thickness
        ));
    }

    /// Build the final SVG string
    pub fn build(self) -> String {
        let nl = self.newline();
        let width = self.config.width;
        let height = self.config.height;

        let mut svg = String::new();

        // XML declaration for standalone
        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            width, height, width, height
        ));
        svg.push_str(nl);

        if !self.defs.is_empty() {
            svg.push_str(&self.indent_str(1));
            svg.push_str("<defs>");
            svg.push_str(nl);
            for def in &self.defs {
                svg.push_str(&self.indent_str(2));
                svg.push_str(def);
                svg.push_str(nl);
            }
            svg.push_str(&self.indent_str(1));
            svg.push_str("</defs>");
            svg.push_str(nl);
        }

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");
        svg.push_str(nl);

        svg
    }
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b"), "a &lt; b");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
    }

    #[test]
    fn test_empty_document() {
        let svg = SvgBuilder::new(SvgConfig::default()).build();
        assert!(svg.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(svg.contains(r#"viewBox="0 0 1200 800""#));
        assert!(svg.contains(r#"width="1200" height="800""#));
        assert!(svg.contains(r#"xmlns:xlink="http://www.w3.org/1999/xlink""#));
        assert!(!svg.contains("<defs>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_not_standalone() {
        let config = SvgConfig::new().with_standalone(false);
        let svg = SvgBuilder::new(config).build();
        assert!(svg.starts_with("<svg"));
    }

    #[test]
    fn test_sphere_defs_and_clip() {
        let mut builder = SvgBuilder::new(SvgConfig::default());
        builder.add_sphere("M0,0L10,0L10,10Z");
        builder.add_background(&MapStyle::default());
        let svg = builder.build();

        assert_eq!(svg.matches("<defs>").count(), 1);
        assert!(svg.contains(r#"<path id="sphere" d="M0,0L10,0L10,10Z"/>"#));
        assert!(svg.contains(
            r##"<clipPath id="clip"><use href="#sphere" xlink:href="#sphere"/></clipPath>"##
        ));
        assert!(svg.contains(
            r##"<use class="background" href="#sphere" xlink:href="#sphere" fill="white" stroke="black" stroke-width="0.5"/>"##
        ));
    }

    #[test]
    fn test_dataset_style() {
        let style = MapStyle {
            line_thickness: 2.5,
            line_color: "#336699".to_string(),
            ..MapStyle::default()
        };
        let mut builder = SvgBuilder::new(SvgConfig::new().with_pretty_print(false));
        builder.add_graticule("M1,1L2,2");
        builder.add_dataset("rivers", "M0,0L5,5", &style);
        let svg = builder.build();

        assert!(!svg.contains('\n'));
        let graticule = svg.find(r#"class="graticule""#).unwrap();
        let dataset = svg.find(r#"class="dataset""#).unwrap();
        assert!(graticule < dataset);
        assert!(svg.contains(r#"stroke-dasharray="2,2""#));
        assert!(svg.contains(r##"data-name="rivers" d="M0,0L5,5" clip-path="url(#clip)" fill="none" stroke="#336699" stroke-width="2.5""##));
    }

    #[test]
    fn test_colors_are_escaped() {
        let style = MapStyle {
            line_color: "\"red\"".to_string(),
            ..MapStyle::default()
        };
        let mut builder = SvgBuilder::new(SvgConfig::default());
        builder.add_dataset("a&b", "M0,0L1,1", &style);
        let svg = builder.build();
        assert!(svg.contains(r#"data-name="a&amp;b""#));
        assert!(svg.contains(r#"stroke="&quot;red&quot;""#));
    }
}
