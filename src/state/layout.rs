/// Masonry column layout
///
/// Columns are filled greedily: each newly ready image goes to the column
/// with the smallest rendered height, leftmost on ties. Placement is final;
/// a column count change rebuilds the buckets and replays loaded images.

/// Vertical gap between stacked images, in logical pixels
pub const IMAGE_GAP: f32 = 10.0;

/// One row of the viewport breakpoint table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    /// Exclusive upper bound of the viewport width for this row
    pub max_width: f32,
    pub columns: usize,
    /// Images requested per loader batch at this density
    pub batch_size: usize,
}

/// Ordered breakpoint table shared by the layout and the loader
pub const BREAKPOINTS: [Breakpoint; 5] = [
    Breakpoint { max_width: 600.0, columns: 2, batch_size: 10 },
    Breakpoint { max_width: 900.0, columns: 3, batch_size: 15 },
    Breakpoint { max_width: 1200.0, columns: 4, batch_size: 20 },
    Breakpoint { max_width: 1500.0, columns: 5, batch_size: 23 },
    Breakpoint { max_width: f32::INFINITY, columns: 6, batch_size: 25 },
];

/// Look up the breakpoint row for a viewport width
pub fn breakpoint_for(viewport_width: f32) -> Breakpoint {
    BREAKPOINTS
        .iter()
        .copied()
        .find(|bp| viewport_width < bp.max_width)
        .unwrap_or(BREAKPOINTS[BREAKPOINTS.len() - 1])
}

/// An image that has been assigned to a column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedImage {
    /// Position in the visible list
    pub index: usize,
    pub width: u32,
    pub height: u32,
}

impl PlacedImage {
    /// Height relative to a width of 1.0
    fn aspect(&self) -> f32 {
        if self.width == 0 {
            1.0
        } else {
            self.height as f32 / self.width as f32
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Column {
    items: Vec<PlacedImage>,
    aspect_sum: f32,
}

impl Column {
    pub fn items(&self) -> &[PlacedImage] {
        &self.items
    }

    /// Height of the column when rendered `column_width` wide
    pub fn rendered_height(&self, column_width: f32) -> f32 {
        column_width * self.aspect_sum + IMAGE_GAP * self.items.len() as f32
    }
}

#[derive(Debug, Clone)]
pub struct ColumnLayout {
    columns: Vec<Column>,
    column_width: f32,
}

impl ColumnLayout {
    pub fn new(column_count: usize, column_width: f32) -> Self {
        let mut layout = Self {
            columns: Vec::new(),
            column_width,
        };
        layout.set_column_count(column_count);
        layout
    }

    /// Build a layout sized for a viewport width
    pub fn for_viewport(viewport_width: f32) -> Self {
        let columns = breakpoint_for(viewport_width).columns;
        Self::new(columns, column_width_for(viewport_width, columns))
    }

    /// Discard every bucket and create `count` empty ones
    pub fn set_column_count(&mut self, count: usize) {
        let count = count.max(1);
        self.columns = vec![Column::default(); count];
    }

    pub fn set_column_width(&mut self, column_width: f32) {
        self.column_width = column_width;
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Total number of placed images across all columns
    pub fn placed_count(&self) -> usize {
        self.columns.iter().map(|c| c.items.len()).sum()
    }

    /// Append an image to the shortest column; returns that column's index
    pub fn place_image(&mut self, image: PlacedImage) -> usize {
        let target = self.shortest_column();
        let column = &mut self.columns[target];
        column.aspect_sum += image.aspect();
        column.items.push(image);
        target
    }

    /// Clear all buckets, then place `images` one by one in the given order
    pub fn reset_and_replay(&mut self, images: impl IntoIterator<Item = PlacedImage>) {
        let count = self.columns.len();
        self.set_column_count(count);
        for image in images {
            self.place_image(image);
        }
    }

    fn shortest_column(&self) -> usize {
        let mut best = 0;
        let mut best_height = f32::INFINITY;
        for (i, column) in self.columns.iter().enumerate() {
            let height = column.rendered_height(self.column_width);
            // strict comparison keeps the leftmost column on ties
            if height < best_height {
                best = i;
                best_height = height;
            }
        }
        best
    }
}

/// Width of one column for a viewport split into `columns`
pub fn column_width_for(viewport_width: f32, columns: usize) -> f32 {
    let columns = columns.max(1) as f32;
    ((viewport_width - IMAGE_GAP * (columns + 1.0)) / columns).max(1.0)
}
