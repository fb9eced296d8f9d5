//! Visual theming for the dependency graph.
//!
//! Provides the node color palette and the fixed emphasis colors used by
//! selection highlighting.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Ordinal palette cycled through for node coloring.
#[derive(Clone, Debug)]
pub struct NodePalette {
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// The classic ten-category palette (default). Distinct hues so that
	/// name prefixes are easy to tell apart.
	pub fn category10() -> Self {
		Self {
			colors: vec![
				Color::rgb(0x1f, 0x77, 0xb4), // Blue
				Color::rgb(0xff, 0x7f, 0x0e), // Orange
				Color::rgb(0x2c, 0xa0, 0x2c), // Green
				Color::rgb(0xd6, 0x27, 0x28), // Red
				Color::rgb(0x94, 0x67, 0xbd), // Purple
				Color::rgb(0x8c, 0x56, 0x4b), // Brown
				Color::rgb(0xe3, 0x77, 0xc2), // Pink
				Color::rgb(0x7f, 0x7f, 0x7f), // Gray
				Color::rgb(0xbc, 0xbd, 0x22), // Olive
				Color::rgb(0x17, 0xbe, 0xcf), // Cyan
			],
		}
	}

	/// Muted slate palette for the dark theme.
	pub fn slate() -> Self {
		Self {
			colors: vec![
				Color::rgb(94, 129, 172),  // Steel blue
				Color::rgb(129, 161, 193), // Light steel
				Color::rgb(100, 148, 160), // Teal gray
				Color::rgb(136, 160, 175), // Cadet blue
				Color::rgb(108, 142, 173), // Air force blue
				Color::rgb(119, 158, 165), // Desaturated cyan
				Color::rgb(143, 163, 180), // Cool gray
				Color::rgb(122, 153, 168), // Dusty blue
			],
		}
	}

	pub fn get(&self, index: usize) -> Color {
		self.colors[index % self.colors.len()]
	}
}

/// Edge visual style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Base edge stroke color.
	pub color: Color,
	/// Base stroke opacity.
	pub opacity: f64,
	/// Base stroke width in screen pixels.
	pub width: f64,
	/// Stroke for edges incident to the selected node.
	pub emphasis_color: Color,
	/// Emphasized stroke width in screen pixels.
	pub emphasis_width: f64,
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Base node radius in world units.
	pub radius: f64,
	/// Hit-test radius in world units.
	pub hit_radius: f64,
	/// Default outline color.
	pub outline: Color,
	/// Default outline width in screen pixels.
	pub outline_width: f64,
	/// Outline for the selected node.
	pub selected_outline: Color,
	pub selected_outline_width: f64,
	/// Outline for direct neighbors of the selection.
	pub neighbor_outline: Color,
	pub neighbor_outline_width: f64,
	/// Label text color.
	pub label_color: Color,
	/// Label font size in screen pixels.
	pub label_size: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: Color,
	pub edge: EdgeStyle,
	pub node: NodeStyle,
	pub tooltip_background: Color,
	pub tooltip_text: Color,
	pub palette: NodePalette,
}

impl Theme {
	/// Light theme matching the classic viewer colors (default).
	pub fn light() -> Self {
		Self {
			name: "light",
			background: Color::rgb(250, 250, 250),
			edge: EdgeStyle {
				color: Color::rgb(0x99, 0x99, 0x99),
				opacity: 0.6,
				width: 2.0,
				emphasis_color: Color::rgb(0x66, 0xaa, 0xff),
				emphasis_width: 3.0,
			},
			node: NodeStyle {
				radius: 5.0,
				hit_radius: 12.0,
				outline: Color::rgb(255, 255, 255),
				outline_width: 1.5,
				selected_outline: Color::rgb(0xff, 0x66, 0x00),
				selected_outline_width: 3.0,
				neighbor_outline: Color::rgb(0x66, 0xaa, 0xff),
				neighbor_outline_width: 2.0,
				label_color: Color::rgb(0x33, 0x33, 0x33),
				label_size: 11.0,
			},
			tooltip_background: Color::rgba(0, 0, 0, 0.7),
			tooltip_text: Color::rgb(255, 255, 255),
			palette: NodePalette::category10(),
		}
	}

	/// Dark variant with a muted palette.
	pub fn midnight() -> Self {
		Self {
			name: "midnight",
			background: Color::rgb(22, 27, 34),
			edge: EdgeStyle {
				color: Color::rgb(140, 160, 180),
				opacity: 0.5,
				width: 2.0,
				emphasis_color: Color::rgb(0x66, 0xaa, 0xff),
				emphasis_width: 3.0,
			},
			node: NodeStyle {
				radius: 5.0,
				hit_radius: 12.0,
				outline: Color::rgb(220, 225, 230),
				outline_width: 1.5,
				selected_outline: Color::rgb(0xff, 0x66, 0x00),
				selected_outline_width: 3.0,
				neighbor_outline: Color::rgb(0x66, 0xaa, 0xff),
				neighbor_outline_width: 2.0,
				label_color: Color::rgb(210, 215, 220),
				label_size: 11.0,
			},
			tooltip_background: Color::rgba(0, 0, 0, 0.8),
			tooltip_text: Color::rgb(240, 240, 240),
			palette: NodePalette::slate(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::light()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn css_formatting() {
		assert_eq!(Color::rgb(0x1f, 0x77, 0xb4).to_css(), "#1f77b4");
		assert_eq!(Color::rgba(0, 0, 0, 0.7).to_css(), "rgba(0, 0, 0, 0.7)");
	}

	#[test]
	fn palette_wraps_around() {
		let palette = NodePalette::category10();
		assert_eq!(palette.get(0), palette.get(10));
	}
}
