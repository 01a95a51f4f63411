use super::types::NodeKind;

pub const DEFAULT_COLOR: &str = "#3399ff";

/// Marker colour for a type tag. Total: unknown tags get `DEFAULT_COLOR`.
pub fn color_for(tag: &str) -> &'static str {
	kind_color(NodeKind::from_tag(tag))
}

pub fn kind_color(kind: NodeKind) -> &'static str {
	match kind {
		NodeKind::Skill => "#ff3333",
		NodeKind::Project => "#00ffaa",
		NodeKind::GitHub => "#00cc88",
		NodeKind::Notion => "#ffaa00",
		NodeKind::Other => DEFAULT_COLOR,
	}
}

/// Parses `#rrggbb` for shading. Palette entries always parse; anything else is grey.
pub fn rgb(hex: &str) -> (u8, u8, u8) {
	let channel = |range| {
		hex.get(range)
			.and_then(|s| u8::from_str_radix(s, 16).ok())
	};
	match (hex.starts_with('#') && hex.len() == 7)
		.then(|| (channel(1..3), channel(3..5), channel(5..7)))
	{
		Some((Some(r), Some(g), Some(b))) => (r, g, b),
		_ => (128, 128, 128),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn known_tags_have_distinct_colors() {
		let colors = ["Skill", "Project", "GitHub", "Notion"].map(color_for);
		for (i, a) in colors.iter().enumerate() {
			assert_ne!(*a, DEFAULT_COLOR);
			for b in &colors[i + 1..] {
				assert_ne!(a, b);
			}
		}
	}

	#[test]
	fn unknown_tags_fall_back_to_default() {
		for tag in ["", "Unknown", "skill", "PROJECT", "Person"] {
			assert_eq!(color_for(tag), DEFAULT_COLOR);
		}
	}

	#[test]
	fn parses_palette_hex() {
		assert_eq!(rgb("#ff3333"), (255, 51, 51));
		assert_eq!(rgb(DEFAULT_COLOR), (51, 153, 255));
		assert_eq!(rgb("red"), (128, 128, 128));
	}
}
