use crate::model::ModelSolution;
use crate::types::{Demand, RollPlan};

/// Expands a solved assignment into cut lists, one per used slot. Slots
/// without any assignment are dropped.
pub fn assemble_rolls(solution: &ModelSolution, demands: &[Demand]) -> Vec<RollPlan> {
    let slots = solution.waste.len();
    let mut rolls = Vec::new();

    for j in 0..slots {
        let pieces: Vec<f64> = demands
            .iter()
            .zip(&solution.x)
            .flat_map(|(d, row)| std::iter::repeat_n(d.width, row[j] as usize))
            .collect();

        if pieces.is_empty() {
            continue;
        }
        rolls.push(RollPlan {
            pieces,
            waste: solution.waste[j],
        });
    }

    rolls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expands_counts_and_drops_empty_slots() {
        let demands = vec![Demand::new(40.0, 2), Demand::new(30.0, 4)];
        let solution = ModelSolution {
            rolls_used: 2,
            x: vec![vec![1, 0, 1], vec![2, 0, 2]],
            waste: vec![0.0, 100.0, 0.0],
        };
        let rolls = assemble_rolls(&solution, &demands);
        assert_eq!(
            rolls,
            vec![
                RollPlan {
                    pieces: vec![40.0, 30.0, 30.0],
                    waste: 0.0
                },
                RollPlan {
                    pieces: vec![40.0, 30.0, 30.0],
                    waste: 0.0
                },
            ]
        );
    }

    #[test]
    fn test_no_slots() {
        let solution = ModelSolution {
            rolls_used: 0,
            x: vec![],
            waste: vec![],
        };
        assert!(assemble_rolls(&solution, &[]).is_empty());
    }
}
