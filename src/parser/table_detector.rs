//! Table detection.
//!
//! Two stages run per page. The bordered stage rebuilds grids from ruling
//! lines and rectangle sides (snap, join, connect, then read cells off the
//! row bands). The stream stage, inspired by Camelot's Stream mode, finds
//! borderless tables from text alignment among the spans the first stage
//! left alone.

use std::collections::{HashMap, HashSet};

use crate::model::{BBox, DetectionMethod, Span, Table, TableCell, TableRow, VectorPrimitive, Warning, WarningKind};

use super::text::TextNormalizer;

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Maximum deviation (points) for a line to count as horizontal/vertical, and snap radius
    pub snap_tolerance: f32,
    /// Maximum gap (points) between collinear segments that are joined
    pub join_tolerance: f32,
    /// Slack (points) when testing whether two edges cross
    pub intersection_tolerance: f32,
    /// Edges shorter than this (points) are dropped
    pub min_edge_length: f32,
    /// Minimum number of closed cells in a bordered grid
    pub min_bordered_cells: usize,
    /// Pages with more vector primitives than this skip grid detection
    pub candidate_cap: usize,
    /// Whether to run the alignment (borderless) stage
    pub detect_borderless: bool,
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum column alignment ratio (0.0-1.0)
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
    /// Minimum number of multi-span rows sharing a column anchor
    pub min_column_rows: usize,
    /// Vertical gap (fraction of font size) that ends a borderless table
    pub max_row_gap_factor: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            snap_tolerance: 3.0,
            join_tolerance: 3.0,
            intersection_tolerance: 3.0,
            min_edge_length: 3.0,
            min_bordered_cells: 2,
            candidate_cap: 400,
            detect_borderless: true,
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
            min_column_rows: 3,
            max_row_gap_factor: 2.5,
        }
    }
}

/// Tables found on one page.
#[derive(Debug, Clone, Default)]
pub struct PageTables {
    /// Tables in top-to-bottom order
    pub tables: Vec<Table>,
    /// Indices of the page spans placed in table cells, ascending
    pub claimed: Vec<usize>,
    /// Warnings raised on this page
    pub warnings: Vec<Warning>,
}

/// Column anchor bucket width (points).
const BUCKET_SIZE: f32 = 5.0;
/// Alignment tolerance against a column anchor (points).
const ALIGN_TOLERANCE: f32 = 5.0;

/// Detects tables from page geometry and text alignment.
pub struct TableDetector<'a> {
    config: &'a TableDetectorConfig,
    normalizer: &'a TextNormalizer,
}

impl<'a> TableDetector<'a> {
    /// Create a detector.
    pub fn new(config: &'a TableDetectorConfig, normalizer: &'a TextNormalizer) -> Self {
        Self { config, normalizer }
    }

    /// Detect tables on a page.
    ///
    /// `spans` must be in reading order; claimed indices refer to it.
    pub fn detect_page(&self, page: u32, spans: &[Span], vectors: &[VectorPrimitive]) -> PageTables {
        let mut result = PageTables::default();
        let mut claimed: HashSet<usize> = HashSet::new();

        if vectors.len() > self.config.candidate_cap {
            log::debug!(
                "page {}: {} vector primitives exceed cap {}, skipping grid detection",
                page,
                vectors.len(),
                self.config.candidate_cap
            );
            result.warnings.push(Warning::on_page(
                WarningKind::TableGeometryOverflow,
                page,
                format!(
                    "{} vector primitives exceed the cap of {}; bordered tables not detected",
                    vectors.len(),
                    self.config.candidate_cap
                ),
            ));
        } else if !vectors.is_empty() {
            for (table, indices) in self.detect_bordered(page, spans, vectors) {
                claimed.extend(indices);
                result.tables.push(table);
            }
        }

        if self.config.detect_borderless {
            let boxes: Vec<BBox> = result.tables.iter().map(|t| t.bbox).collect();
            for (table, indices) in self.detect_aligned(page, spans, &claimed, &boxes) {
                claimed.extend(indices);
                result.tables.push(table);
            }
        }

        result.tables.sort_by(|a, b| {
            a.bbox
                .y0
                .partial_cmp(&b.bbox.y0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.bbox.x0.partial_cmp(&b.bbox.x0).unwrap_or(std::cmp::Ordering::Equal))
        });
        result.claimed = claimed.into_iter().collect();
        result.claimed.sort_unstable();

        if !result.tables.is_empty() {
            log::debug!("page {}: {} tables", page, result.tables.len());
        }
        result
    }

    // ------------------------------------------------------------------
    // Bordered stage
    // ------------------------------------------------------------------

    fn detect_bordered(
        &self,
        page: u32,
        spans: &[Span],
        vectors: &[VectorPrimitive],
    ) -> Vec<(Table, Vec<usize>)> {
        let edges = self.collect_edges(vectors);
        let (mut horizontals, mut verticals): (Vec<Edge>, Vec<Edge>) = edges
            .into_iter()
            .partition(|e| e.orientation == Orientation::Horizontal);

        snap_edges(&mut horizontals, self.config.snap_tolerance);
        snap_edges(&mut verticals, self.config.snap_tolerance);
        let horizontals = join_collinear(horizontals, self.config.join_tolerance);
        let verticals = join_collinear(verticals, self.config.join_tolerance);

        let mut tables = Vec::new();
        let mut taken: HashSet<usize> = HashSet::new();

        for (hs, vs) in self.connected_grids(&horizontals, &verticals) {
            if hs.len() < 2 || vs.len() < 2 {
                continue;
            }
            if let Some((table, indices)) = self.grid_to_table(page, &hs, &vs, spans, &taken) {
                taken.extend(indices.iter().copied());
                tables.push((table, indices));
            }
        }
        tables
    }

    /// Classify line and rectangle sides into axis-aligned edges.
    fn collect_edges(&self, vectors: &[VectorPrimitive]) -> Vec<Edge> {
        let tol = self.config.snap_tolerance;
        let mut edges = Vec::new();

        let mut push_line = |x0: f32, y0: f32, x1: f32, y1: f32| {
            if (y0 - y1).abs() <= tol {
                edges.push(Edge::new(Orientation::Horizontal, (y0 + y1) / 2.0, x0, x1));
            } else if (x0 - x1).abs() <= tol {
                edges.push(Edge::new(Orientation::Vertical, (x0 + x1) / 2.0, y0, y1));
            }
        };

        for vector in vectors {
            match *vector {
                VectorPrimitive::Line { x0, y0, x1, y1 } => push_line(x0, y0, x1, y1),
                VectorPrimitive::Rect { x0, y0, x1, y1 } => {
                    let b = BBox::new(x0, y0, x1, y1);
                    push_line(b.x0, b.y0, b.x1, b.y0);
                    push_line(b.x0, b.y1, b.x1, b.y1);
                    push_line(b.x0, b.y0, b.x0, b.y1);
                    push_line(b.x1, b.y0, b.x1, b.y1);
                }
            }
        }

        edges.retain(|e| e.len() >= self.config.min_edge_length);
        edges
    }

    /// Group edges into connected components of crossing edges.
    fn connected_grids(&self, horizontals: &[Edge], verticals: &[Edge]) -> Vec<(Vec<Edge>, Vec<Edge>)> {
        let n = horizontals.len() + verticals.len();
        let mut parent: Vec<usize> = (0..n).collect();

        fn find(parent: &mut [usize], mut i: usize) -> usize {
            while parent[i] != i {
                parent[i] = parent[parent[i]]; // path compression
                i = parent[i];
            }
            i
        }

        let tol = self.config.intersection_tolerance;
        for (hi, h) in horizontals.iter().enumerate() {
            for (vi, v) in verticals.iter().enumerate() {
                if h.crosses(v, tol) {
                    let a = find(&mut parent, hi);
                    let b = find(&mut parent, horizontals.len() + vi);
                    if a != b {
                        parent[b] = a;
                    }
                }
            }
        }

        let mut groups: HashMap<usize, (Vec<Edge>, Vec<Edge>)> = HashMap::new();
        let mut order = Vec::new();
        for i in 0..n {
            let root = find(&mut parent, i);
            let group = groups.entry(root).or_insert_with(|| {
                order.push(root);
                (Vec::new(), Vec::new())
            });
            if i < horizontals.len() {
                group.0.push(horizontals[i]);
            } else {
                group.1.push(verticals[i - horizontals.len()]);
            }
        }

        order.into_iter().filter_map(|root| groups.remove(&root)).collect()
    }

    /// Read the cells of one connected grid.
    fn grid_to_table(
        &self,
        page: u32,
        hs: &[Edge],
        vs: &[Edge],
        spans: &[Span],
        taken: &HashSet<usize>,
    ) -> Option<(Table, Vec<usize>)> {
        let tol = self.config.snap_tolerance;
        let ys = unique_positions(hs);
        let xs = unique_positions(vs);
        let (&x_min, &x_max) = (xs.first()?, xs.last()?);
        let (&y_min, &y_max) = (ys.first()?, ys.last()?);
        let bbox = BBox::new(x_min, y_min, x_max, y_max);

        let mut table = Table::new(page, bbox, DetectionMethod::Bordered);
        let mut claimed: Vec<usize> = Vec::new();
        let mut closed_cells = 0usize;

        for band in ys.windows(2) {
            let (top, bottom) = (band[0], band[1]);

            // Vertical dividers spanning the whole band
            let dividers: Vec<usize> = xs
                .iter()
                .enumerate()
                .filter(|&(_, &x)| {
                    vs.iter().any(|v| {
                        (v.pos - x).abs() < f32::EPSILON * 16.0
                            && v.start <= top + tol
                            && v.end >= bottom - tol
                    })
                })
                .map(|(i, _)| i)
                .collect();
            if dividers.len() < 2 {
                continue;
            }

            let mut cells = Vec::new();
            if dividers[0] > 0 {
                cells.push(TableCell::empty().colspan(dividers[0] as u32));
            }

            for pair in dividers.windows(2) {
                let (xa, xb) = (xs[pair[0]], xs[pair[1]]);
                let cell_box = BBox::new(xa, top, xb, bottom);

                let covered = |y: f32| {
                    hs.iter().any(|h| {
                        (h.pos - y).abs() < f32::EPSILON * 16.0 && h.start <= xa + tol && h.end >= xb - tol
                    })
                };
                if covered(top) && covered(bottom) {
                    closed_cells += 1;
                }

                let inside: Vec<usize> = spans
                    .iter()
                    .enumerate()
                    .filter(|(i, s)| {
                        let (cx, cy) = s.bbox.centroid();
                        !taken.contains(i) && !claimed.contains(i) && cell_box.contains_point(cx, cy)
                    })
                    .map(|(i, _)| i)
                    .collect();

                let refs: Vec<&Span> = inside.iter().map(|&i| &spans[i]).collect();
                let text = self.normalizer.compose(&refs);
                cells.push(
                    TableCell::text(text)
                        .colspan((pair[1] - pair[0]) as u32)
                        .with_span_count(inside.len()),
                );
                claimed.extend(inside);
            }

            table.add_row(TableRow::new(cells));
        }

        if closed_cells < self.config.min_bordered_cells {
            log::debug!(
                "page {}: grid at {:?} has {} closed cells, treating as frame",
                page,
                bbox,
                closed_cells
            );
            return None;
        }
        if table.is_blank() {
            log::debug!("page {}: grid at {:?} has no text", page, bbox);
            return None;
        }

        table.normalize();
        log::debug!(
            "page {}: bordered table {}x{} at {:?}",
            page,
            table.row_count(),
            table.column_count(),
            bbox
        );
        Some((table, claimed))
    }

    // ------------------------------------------------------------------
    // Alignment stage
    // ------------------------------------------------------------------

    fn detect_aligned(
        &self,
        page: u32,
        spans: &[Span],
        claimed: &HashSet<usize>,
        boxes: &[BBox],
    ) -> Vec<(Table, Vec<usize>)> {
        let available: Vec<usize> = (0..spans.len())
            .filter(|i| !claimed.contains(i))
            .filter(|&i| {
                let (cx, cy) = spans[i].bbox.centroid();
                !spans[i].is_blank() && !boxes.iter().any(|b| b.contains_point(cx, cy))
            })
            .collect();

        if available.len() < self.config.min_rows * self.config.min_columns {
            return Vec::new();
        }

        let rows = self.group_into_rows(spans, &available);
        if rows.len() < self.config.min_rows {
            return Vec::new();
        }

        let anchors = self.detect_columns(spans, &rows, self.config.min_column_rows);
        log::debug!("page {}: column anchors {:?}", page, anchors);
        if anchors.len() < self.config.min_columns {
            return Vec::new();
        }

        let mut tables = Vec::new();
        for (start, end) in self.find_table_regions(spans, &rows, &anchors, boxes) {
            let region = &rows[start..=end];
            let columns = self.detect_columns(spans, region, 2);

            if columns.len() < self.config.min_columns {
                continue;
            }
            if columns.len() > self.config.max_columns {
                log::debug!(
                    "page {}: skipping region, too many columns ({} > {})",
                    page,
                    columns.len(),
                    self.config.max_columns
                );
                continue;
            }
            if self.is_list_pattern(spans, region, &columns) {
                log::debug!("page {}: skipping region, detected as list pattern", page);
                continue;
            }

            let Some((table, indices)) = self.region_to_table(page, spans, region, &columns) else {
                continue;
            };
            if boxes.iter().any(|b| b.intersects(&table.bbox)) {
                log::debug!("page {}: inferred table overlaps a bordered table, discarded", page);
                continue;
            }
            tables.push((table, indices));
        }
        tables
    }

    /// Group spans into rows by top position.
    fn group_into_rows(&self, spans: &[Span], indices: &[usize]) -> Vec<RowData> {
        let mut sorted = indices.to_vec();
        sorted.sort_by(|&a, &b| {
            spans[a]
                .bbox
                .y0
                .partial_cmp(&spans[b].bbox.y0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    spans[a]
                        .bbox
                        .x0
                        .partial_cmp(&spans[b].bbox.x0)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        });

        let mut rows: Vec<RowData> = Vec::new();
        let mut current: Vec<usize> = Vec::new();
        let mut current_y: Option<f32> = None;

        for i in sorted {
            let span = &spans[i];
            let y_tolerance = span.size * self.config.y_tolerance_factor;

            match current_y {
                Some(y) if (span.bbox.y0 - y).abs() <= y_tolerance => current.push(i),
                _ => {
                    if !current.is_empty() {
                        rows.push(RowData::new(spans, std::mem::take(&mut current)));
                    }
                    current_y = Some(span.bbox.y0);
                    current.push(i);
                }
            }
        }
        if !current.is_empty() {
            rows.push(RowData::new(spans, current));
        }

        rows
    }

    /// Find left-edge anchors shared by at least `min_rows` multi-span rows.
    fn detect_columns(&self, spans: &[Span], rows: &[RowData], min_rows: usize) -> Vec<f32> {
        let multi_span_rows: Vec<&RowData> = rows.iter().filter(|r| r.spans.len() >= 2).collect();

        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        for row in &multi_span_rows {
            // Count each bucket only once per row
            let buckets: HashSet<i32> = row
                .spans
                .iter()
                .map(|&i| (spans[i].bbox.x0 / BUCKET_SIZE).round() as i32)
                .collect();
            for bucket in buckets {
                *edge_counts.entry(bucket).or_insert(0) += 1;
            }
        }

        let min_occurrences = ((multi_span_rows.len() as f32 * self.config.min_alignment_ratio) as usize)
            .max(min_rows)
            .max(2);

        let mut column_edges: Vec<f32> = edge_counts
            .iter()
            .filter(|(_, count)| **count >= min_occurrences)
            .map(|(bucket, _)| *bucket as f32 * BUCKET_SIZE)
            .collect();
        column_edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        // Merge close edges
        let mut merged: Vec<f32> = Vec::new();
        for edge in column_edges {
            match merged.last() {
                Some(&last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// Find runs of consecutive rows that touch at least two anchors.
    fn find_table_regions(
        &self,
        spans: &[Span],
        rows: &[RowData],
        anchors: &[f32],
        boxes: &[BBox],
    ) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut current_start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            let aligned = row.anchors_touched(spans, anchors) >= 2;

            let broken = match (current_start, i.checked_sub(1).map(|p| &rows[p])) {
                (Some(_), Some(prev)) => {
                    let gap = row.top - prev.bottom;
                    gap > row.size.max(prev.size) * self.config.max_row_gap_factor
                        || boxes.iter().any(|b| b.y0 >= prev.bottom && b.y1 <= row.top)
                }
                _ => false,
            };

            if broken || !aligned {
                if let Some(start) = current_start.take() {
                    if i - start >= self.config.min_rows {
                        regions.push((start, i - 1));
                    }
                }
            }
            if aligned && current_start.is_none() {
                current_start = Some(i);
            }
        }

        if let Some(start) = current_start {
            if rows.len() - start >= self.config.min_rows {
                regions.push((start, rows.len() - 1));
            }
        }
        regions
    }

    /// Build the grid for a region; spans outside every column band stay in prose.
    fn region_to_table(
        &self,
        page: u32,
        spans: &[Span],
        rows: &[RowData],
        columns: &[f32],
    ) -> Option<(Table, Vec<usize>)> {
        let right_edge = rows
            .iter()
            .flat_map(|r| r.spans.iter())
            .map(|&i| spans[i].bbox.x1)
            .fold(f32::MIN, f32::max)
            + self.config.min_column_gap;

        let mut grid: Vec<Vec<Vec<usize>>> = Vec::with_capacity(rows.len());
        let mut used: Vec<usize> = Vec::new();

        for row in rows {
            let mut cells: Vec<Vec<usize>> = vec![Vec::new(); columns.len()];
            for &i in &row.spans {
                if let Some(col) = find_column_for_span(&spans[i], columns, right_edge) {
                    cells[col].push(i);
                    used.push(i);
                }
            }
            grid.push(cells);
        }

        let bbox = BBox::union_all(used.iter().map(|&i| &spans[i].bbox))?;
        let slots = rows.len() * columns.len();
        let filled = grid.iter().flatten().filter(|c| !c.is_empty()).count();
        let confidence = 0.3 + 0.5 * filled as f32 / slots.max(1) as f32;

        let mut table = Table::new(page, bbox, DetectionMethod::Inferred).with_confidence(confidence);
        for cells in grid {
            let row = cells
                .into_iter()
                .map(|indices| {
                    let refs: Vec<&Span> = indices.iter().map(|&i| &spans[i]).collect();
                    TableCell::text(self.normalizer.compose(&refs)).with_span_count(indices.len())
                })
                .collect();
            table.add_row(TableRow::new(row));
        }
        table.normalize();

        log::debug!(
            "page {}: inferred table {}x{} at {:?} (confidence {:.2})",
            page,
            table.row_count(),
            table.column_count(),
            bbox,
            confidence
        );
        Some((table, used))
    }

    /// Check if region rows actually represent a numbered or bulleted list.
    ///
    /// When a list item's marker and text are separate spans they look like
    /// two aligned columns.
    fn is_list_pattern(&self, spans: &[Span], rows: &[RowData], columns: &[f32]) -> bool {
        if columns.len() < 2 || rows.is_empty() {
            return false;
        }

        let mut bullet_count = 0;
        let mut number_count = 0;

        for row in rows {
            let first_span = row.spans.iter().map(|&i| &spans[i]).min_by(|a, b| {
                a.bbox
                    .x0
                    .partial_cmp(&b.bbox.x0)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            if let Some(span) = first_span {
                let text = span.text.trim();
                if is_bullet_marker(text) {
                    bullet_count += 1;
                } else if is_number_marker(text) {
                    number_count += 1;
                }
            }
        }

        let bullet_ratio = bullet_count as f32 / rows.len() as f32;
        let total_ratio = (bullet_count + number_count) as f32 / rows.len() as f32;

        // Bullet markers are almost never real table data
        if bullet_ratio >= 0.5 {
            return true;
        }

        // Numbered first columns are common in real tables; only reject two-column layouts
        columns.len() == 2 && total_ratio >= 0.5
    }
}

/// A row of spans grouped by top position.
#[derive(Debug, Clone)]
struct RowData {
    top: f32,
    bottom: f32,
    size: f32,
    spans: Vec<usize>,
}

impl RowData {
    fn new(spans: &[Span], mut indices: Vec<usize>) -> Self {
        indices.sort_by(|&a, &b| {
            spans[a]
                .bbox
                .x0
                .partial_cmp(&spans[b].bbox.x0)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let top = indices.iter().map(|&i| spans[i].bbox.y0).fold(f32::MAX, f32::min);
        let bottom = indices.iter().map(|&i| spans[i].bbox.y1).fold(f32::MIN, f32::max);
        let size = indices.iter().map(|&i| spans[i].size).fold(0.0, f32::max);
        Self {
            top,
            bottom,
            size,
            spans: indices,
        }
    }

    fn anchors_touched(&self, spans: &[Span], anchors: &[f32]) -> usize {
        anchors
            .iter()
            .filter(|&&a| {
                self.spans
                    .iter()
                    .any(|&i| (spans[i].bbox.x0 - a).abs() <= ALIGN_TOLERANCE)
            })
            .count()
    }
}

/// Find the column a span belongs to.
///
/// A span belongs to a column when its left edge is aligned with the column
/// anchor, or when it fits entirely inside the column band.
fn find_column_for_span(span: &Span, columns: &[f32], right_edge: f32) -> Option<usize> {
    if let Some(i) = columns
        .iter()
        .position(|&c| (span.bbox.x0 - c).abs() <= ALIGN_TOLERANCE)
    {
        return Some(i);
    }

    columns.iter().enumerate().find_map(|(i, &col_start)| {
        let col_end = columns.get(i + 1).map_or(right_edge, |next| next - ALIGN_TOLERANCE);
        (span.bbox.x0 >= col_start - ALIGN_TOLERANCE && span.bbox.x1 <= col_end).then_some(i)
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Orientation {
    Horizontal,
    Vertical,
}

/// An axis-aligned ruling segment: `pos` is y for horizontals and x for verticals.
#[derive(Debug, Clone, Copy)]
struct Edge {
    orientation: Orientation,
    pos: f32,
    start: f32,
    end: f32,
}

impl Edge {
    fn new(orientation: Orientation, pos: f32, a: f32, b: f32) -> Self {
        Self {
            orientation,
            pos,
            start: a.min(b),
            end: a.max(b),
        }
    }

    fn len(&self) -> f32 {
        self.end - self.start
    }

    /// Check whether a horizontal edge crosses a vertical one.
    fn crosses(&self, other: &Edge, tol: f32) -> bool {
        other.pos >= self.start - tol
            && other.pos <= self.end + tol
            && self.pos >= other.start - tol
            && self.pos <= other.end + tol
    }
}

/// Cluster edges by position and snap each cluster to its mean.
fn snap_edges(edges: &mut [Edge], tolerance: f32) {
    if edges.is_empty() {
        return;
    }
    edges.sort_by(|a, b| a.pos.partial_cmp(&b.pos).unwrap_or(std::cmp::Ordering::Equal));

    let mut cluster_start = 0;
    for i in 1..=edges.len() {
        let end_of_cluster = i == edges.len() || (edges[i].pos - edges[cluster_start].pos).abs() > tolerance;
        if end_of_cluster {
            let sum: f32 = edges[cluster_start..i].iter().map(|e| e.pos).sum();
            let mean = sum / (i - cluster_start) as f32;
            for edge in &mut edges[cluster_start..i] {
                edge.pos = mean;
            }
            cluster_start = i;
        }
    }
}

/// Merge overlapping or nearly touching segments that share a position.
fn join_collinear(mut edges: Vec<Edge>, tolerance: f32) -> Vec<Edge> {
    edges.sort_by(|a, b| {
        a.pos
            .partial_cmp(&b.pos)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.start.partial_cmp(&b.start).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut result: Vec<Edge> = Vec::with_capacity(edges.len());
    for edge in edges {
        match result.last_mut() {
            Some(last) if last.pos == edge.pos && edge.start <= last.end + tolerance => {
                last.end = last.end.max(edge.end);
            }
            _ => result.push(edge),
        }
    }
    result
}

/// Sorted distinct positions of snapped edges.
fn unique_positions(edges: &[Edge]) -> Vec<f32> {
    let mut positions: Vec<f32> = edges.iter().map(|e| e.pos).collect();
    positions.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    positions.dedup();
    positions
}

/// Check if text is a bullet marker (•, -, etc.).
fn is_bullet_marker(text: &str) -> bool {
    let trimmed = text.trim();
    matches!(
        trimmed,
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "▹" | "►" | "■" | "●" | "※" | "□" | "◆" | "◇" | "▶" | "▷" | "☞" | "➤" | "➜"
    )
}

/// Check if text is a number-style list marker (1., 2), a., etc.).
fn is_number_marker(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }

    // Remove internal whitespace (handles "1 .")
    let cleaned: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();

    if let Some(pos) = cleaned.find(|c: char| !c.is_ascii_digit()) {
        let prefix = &cleaned[..pos];
        let suffix = &cleaned[pos..];
        if !prefix.is_empty() && (suffix == "." || suffix == ")") {
            return true;
        }
    }

    if cleaned.parse::<u32>().is_ok() {
        return true;
    }

    // Letter marker: "a.", "B)"
    let chars: Vec<char> = cleaned.chars().collect();
    chars.len() == 2 && chars[0].is_alphabetic() && (chars[1] == '.' || chars[1] == ')')
}
