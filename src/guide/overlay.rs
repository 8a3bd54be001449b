use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::core::{GoalBox, Rgb8};
use crate::foundation::error::{KeeperError, KeeperResult};
use crate::foundation::math::over_premul_channel;
use crate::guide::partition::GoalRegions;
use crate::render::frame::VideoFrame;

const LINE_COLOR: Rgb8 = Rgb8::new(255, 255, 255);
const LINE_WIDTH: u32 = 2;
const LABEL_INSET_X: u32 = 10;
const LABEL_INSET_Y: u32 = 30;
const LABEL_FONT_PX: u32 = 24;
const LABEL_COLORS: [Rgb8; 3] = [
    Rgb8::new(255, 0, 0),
    Rgb8::new(255, 255, 0),
    Rgb8::new(0, 255, 0),
];

/// Optional text drawn in the left, center and right regions.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegionLabels {
    /// Left region label.
    pub left: Option<String>,
    /// Center region label.
    pub center: Option<String>,
    /// Right region label.
    pub right: Option<String>,
}

impl RegionLabels {
    fn as_array(&self) -> [Option<&str>; 3] {
        [
            self.left.as_deref(),
            self.center.as_deref(),
            self.right.as_deref(),
        ]
    }
}

/// Diagnostic overlay: goal outline, region separators and optional labels.
///
/// Drawing builds a small SVG and rasterizes it with `resvg`, so labels use whatever system fonts
/// `fontdb` finds. With no fonts installed, labels render nothing and lines still draw.
#[derive(Clone)]
pub struct GuideOverlay {
    labels: RegionLabels,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for GuideOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuideOverlay")
            .field("labels", &self.labels)
            .field("font_faces", &self.fontdb.len())
            .finish()
    }
}

impl GuideOverlay {
    /// Build an overlay, loading system fonts once.
    pub fn new(labels: RegionLabels) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded fonts for guide labels");
        Self::with_fontdb(labels, Arc::new(db))
    }

    /// Build an overlay sharing an existing font database.
    pub fn with_fontdb(labels: RegionLabels, fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self { labels, fontdb }
    }

    /// Labels drawn by this overlay.
    pub fn labels(&self) -> &RegionLabels {
        &self.labels
    }

    /// Draw the partition of `goal` onto `frame`. No-op for `None`.
    pub fn draw(&self, frame: &mut VideoFrame, goal: Option<GoalBox>) -> KeeperResult<()> {
        let Some(goal) = goal else {
            return Ok(());
        };
        if frame.width == 0 || frame.height == 0 {
            return Ok(());
        }
        let regions = GoalRegions::split(goal);
        let svg = self.svg_document(frame.width, frame.height, &regions);

        let opts = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(svg.as_bytes(), &opts).context("parse guide svg")?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(frame.width, frame.height)
            .ok_or_else(|| KeeperError::validation("failed to allocate guide pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::default(),
            &mut pixmap.as_mut(),
        );

        for (dst, src) in frame
            .data
            .chunks_exact_mut(3)
            .zip(pixmap.data().chunks_exact(4))
        {
            let a = src[3];
            if a == 0 {
                continue;
            }
            for c in 0..3 {
                dst[c] = over_premul_channel(dst[c], src[c], a);
            }
        }
        Ok(())
    }

    /// SVG markup for the overlay in frame pixel coordinates.
    pub fn svg_document(&self, width: u32, height: u32, regions: &GoalRegions) -> String {
        let g = regions.goal;
        let [b1, b2] = regions.boundaries();
        let stroke = LINE_COLOR.to_hex();

        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        let _ = write!(
            svg,
            r#"<g fill="none" stroke="{stroke}" stroke-width="{LINE_WIDTH}" shape-rendering="crispEdges">"#
        );
        let _ = write!(
            svg,
            r#"<rect x="{}" y="{}" width="{}" height="{}"/>"#,
            g.x1,
            g.y1,
            g.width(),
            g.height()
        );
        for b in [b1, b2] {
            let _ = write!(
                svg,
                r#"<line x1="{b}" y1="{}" x2="{b}" y2="{}"/>"#,
                g.y1, g.y2
            );
        }
        svg.push_str("</g>");

        for ((span, label), color) in regions
            .spans()
            .iter()
            .zip(self.labels.as_array())
            .zip(LABEL_COLORS)
        {
            let Some(label) = label else {
                continue;
            };
            let _ = write!(
                svg,
                r#"<text x="{}" y="{}" font-family="sans-serif" font-size="{LABEL_FONT_PX}" font-weight="bold" fill="{}">{}</text>"#,
                span.x_start + LABEL_INSET_X,
                g.y1 + LABEL_INSET_Y,
                color.to_hex(),
                escape_xml(label)
            );
        }

        svg.push_str("</svg>");
        svg
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/guide/overlay.rs"]
mod tests;
