use crate::types::{Demand, EPS};

/// Roll-count window and per-demand copy caps used to size the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bounds {
    pub lower: usize,
    pub upper: usize,
    pub per_demand_cap: Vec<u32>,
}

impl Bounds {
    /// Estimates bounds for `demands` (sorted by descending width) on a roll
    /// of `parent_width`.
    ///
    /// The lower bound is the volumetric one. The upper bound is the roll
    /// count of a next-fit pass over the demands, so a packing with exactly
    /// `upper` rolls always exists.
    pub fn estimate(demands: &[Demand], parent_width: f64) -> Self {
        let mut per_demand_cap = Vec::with_capacity(demands.len());
        let mut fill = 0.0;
        let mut volume = 0.0;
        let mut upper = 1usize;

        for d in demands {
            let fit = ((parent_width / d.width) + EPS).floor() as u32;
            per_demand_cap.push(d.qty.min(fit));

            volume += d.volume();
            if fill + d.volume() <= parent_width + EPS {
                fill += d.volume();
                continue;
            }

            let mut remaining = d.qty;
            while remaining > 0 {
                if fill + d.width <= parent_width + EPS {
                    fill += d.width;
                    remaining -= 1;
                } else {
                    upper += 1;
                    fill = 0.0;
                }
            }
        }

        let lower = ((volume / parent_width - EPS).ceil() as usize).max(1);

        Self {
            lower,
            upper: upper.max(lower),
            per_demand_cap,
        }
    }

    pub fn slots(&self) -> usize {
        self.upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CuttingModel;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_two_width_mix() {
        let demands = vec![Demand::new(40.0, 2), Demand::new(30.0, 4)];
        let b = Bounds::estimate(&demands, 100.0);
        // 200 units of volume on 100-wide rolls
        assert_eq!(b.lower, 2);
        // next-fit: [40,40] [30,30,30] [30]
        assert_eq!(b.upper, 3);
        assert_eq!(b.per_demand_cap, vec![2, 3]);
    }

    #[test]
    fn test_single_full_width_piece() {
        let b = Bounds::estimate(&[Demand::new(100.0, 1)], 100.0);
        assert_eq!(b.lower, 1);
        assert_eq!(b.upper, 1);
        assert_eq!(b.per_demand_cap, vec![1]);
    }

    #[test]
    fn test_exact_volume_does_not_round_up() {
        let demands = vec![Demand::new(50.0, 5), Demand::new(25.0, 6), Demand::new(20.0, 5)];
        let b = Bounds::estimate(&demands, 100.0);
        assert_eq!(b.lower, 5);
        assert_eq!(b.upper, 5);
    }

    #[test]
    fn test_cap_limited_by_quantity() {
        let b = Bounds::estimate(&[Demand::new(10.0, 3)], 100.0);
        assert_eq!(b.per_demand_cap, vec![3]);
        let b = Bounds::estimate(&[Demand::new(33.4, 10)], 100.0);
        assert_eq!(b.per_demand_cap, vec![2]);
    }

    #[test]
    fn test_zero_quantities() {
        let b = Bounds::estimate(&[Demand::new(10.0, 0)], 100.0);
        assert_eq!(b.lower, 1);
        assert_eq!(b.upper, 1);
        assert_eq!(b.per_demand_cap, vec![0]);
    }

    #[rstest]
    #[case(vec![Demand::new(40.0, 2), Demand::new(30.0, 4)])]
    #[case(vec![Demand::new(60.0, 2), Demand::new(20.0, 3)])]
    #[case(vec![Demand::new(55.0, 3), Demand::new(45.0, 1), Demand::new(10.0, 4)])]
    #[case(vec![Demand::new(70.0, 1), Demand::new(35.0, 3), Demand::new(15.0, 2)])]
    fn test_optimum_within_bounds(#[case] demands: Vec<Demand>) {
        let bounds = Bounds::estimate(&demands, 100.0);
        let sol = CuttingModel::build(&demands, 100.0, &bounds, true)
            .solve(None)
            .unwrap();
        assert!(
            bounds.lower <= sol.rolls_used && sol.rolls_used <= bounds.upper,
            "{} rolls outside [{}, {}]",
            sol.rolls_used,
            bounds.lower,
            bounds.upper
        );
    }

    proptest! {
        #[test]
        fn prop_lower_never_exceeds_upper(
            raw in prop::collection::vec((1u32..=100, 0u32..20), 1..12),
        ) {
            let demands = crate::types::aggregate_demands(
                raw.into_iter().map(|(w, q)| Demand::new(w as f64, q)),
            );
            let b = Bounds::estimate(&demands, 100.0);
            prop_assert!(b.lower >= 1);
            prop_assert!(b.lower <= b.upper);
            let volume: f64 = demands.iter().map(|d| d.volume()).sum();
            prop_assert!(b.upper as f64 * 100.0 + 1e-6 >= volume);
        }
    }
}
