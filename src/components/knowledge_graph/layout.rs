use std::collections::HashMap;
use std::f64::consts::PI;

use super::types::Node;
use crate::config::LayoutParams;

pub type Point3 = [f64; 3];

/// Identity → position for one node sequence. Rebuilt wholesale, never patched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
	positions: HashMap<String, Point3>,
}

impl Layout {
	/// Places node `i` of `n` at `θ = 2πi/n` on a ring of `radius` in the XY plane,
	/// lifted by `z_amplitude * sin(2θ)`. Depends only on order and count.
	pub fn compute(nodes: &[Node], params: LayoutParams) -> Self {
		let n = nodes.len() as f64;
		let positions = nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				let angle = (i as f64 / n) * 2.0 * PI;
				(
					node.id.clone(),
					[
						params.radius * angle.cos(),
						params.radius * angle.sin(),
						params.z_amplitude * (2.0 * angle).sin(),
					],
				)
			})
			.collect();
		Self { positions }
	}

	pub fn position(&self, id: &str) -> Option<Point3> {
		self.positions.get(id).copied()
	}

	pub fn len(&self) -> usize {
		self.positions.len()
	}

	#[cfg(test)]
	pub fn is_empty(&self) -> bool {
		self.positions.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn nodes(n: usize) -> Vec<Node> {
		(0..n)
			.map(|i| Node::new(format!("n{i}"), format!("Node {i}"), "Skill"))
			.collect()
	}

	#[test]
	fn empty_sequence_yields_empty_layout() {
		let layout = Layout::compute(&[], LayoutParams::default());
		assert!(layout.is_empty());
	}

	#[test]
	fn single_node_sits_at_angle_zero() {
		let layout = Layout::compute(&nodes(1), LayoutParams::default());
		assert_eq!(layout.position("n0"), Some([6.0, 0.0, 0.0]));
	}

	#[test]
	fn one_position_per_node_all_distinct() {
		let params = LayoutParams::default();
		for n in [2, 3, 7, 64, 200] {
			let list = nodes(n);
			let layout = Layout::compute(&list, params);
			assert_eq!(layout.len(), n);
			let points: Vec<_> = list
				.iter()
				.map(|node| layout.position(&node.id).unwrap())
				.collect();
			for (i, a) in points.iter().enumerate() {
				for b in &points[i + 1..] {
					let d = (0..3).map(|k| (a[k] - b[k]).powi(2)).sum::<f64>();
					assert!(d > 1e-9, "{n} nodes: {a:?} coincides with {b:?}");
				}
			}
		}
	}

	#[test]
	fn recomputation_is_idempotent() {
		let list = nodes(12);
		let params = LayoutParams::default();
		assert_eq!(Layout::compute(&list, params), Layout::compute(&list, params));
	}

	#[test]
	fn z_follows_double_frequency() {
		let layout = Layout::compute(&nodes(8), LayoutParams::default());
		// θ = π/4 → sin(π/2) = 1
		let [x, y, z] = layout.position("n1").unwrap();
		assert!((z - 2.0).abs() < 1e-12);
		assert!((x.hypot(y) - 6.0).abs() < 1e-12);
		// θ = π/2 → sin(π) = 0
		assert!(layout.position("n2").unwrap()[2].abs() < 1e-12);
	}

	#[test]
	fn reordering_moves_nodes() {
		let mut list = nodes(4);
		let params = LayoutParams::default();
		let before = Layout::compute(&list, params);
		list.swap(0, 1);
		let after = Layout::compute(&list, params);
		assert_eq!(after.position("n1"), before.position("n0"));
		assert_ne!(after.position("n0"), before.position("n0"));
	}
}
