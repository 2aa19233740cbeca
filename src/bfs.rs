//! Bounded breadth-first traversal engine (§4.E).
//!
//! Walks outward from one origin over an [`AxialGraph`], tracking walking
//! distance, turn-steps, forward/backward accumulated angle, and axmeter
//! simultaneously, each capped by an optional radius. Per-line-crossing
//! checkpoints make the traversal Pareto-admissible rather than monotone:
//! a state is expanded further whenever it improves *any* active metric,
//! but only overwrites the checkpoint when it does not also worsen another
//! (§9 "Open questions" flags this as the subtle part to test).

use crate::axial_graph::AxialGraph;
use crate::coords::angle_diff_deg;
use crate::distance::{DistanceType, Radii};
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Checkpoint {
    pub walking: f32,
    pub turns: u32,
    pub fw_angle: f32,
    pub bk_angle: f32,
    pub axmeter: f32,
}

impl Checkpoint {
    pub const UNVISITED: Checkpoint = Checkpoint {
        walking: f32::MAX,
        turns: u32::MAX,
        fw_angle: f32::MAX,
        bk_angle: f32::MAX,
        axmeter: f32::MAX,
    };
}

/// Which of the five metrics are live for the current analysis: the
/// primary distance type plus whichever radii are capped (§4.E "those
/// enabled by the current analysis distance type OR by any active radius").
#[derive(Clone, Copy, Debug)]
pub struct ActiveMetrics {
    pub walking: bool,
    pub turns: bool,
    pub angle: bool,
    pub axmeter: bool,
}

impl ActiveMetrics {
    pub fn from(primary: DistanceType, radii: &Radii) -> Self {
        ActiveMetrics {
            walking: primary == DistanceType::Walking || radii.walking.is_some(),
            turns: primary == DistanceType::Steps || radii.steps.is_some(),
            angle: primary == DistanceType::Angular || radii.angular.is_some(),
            axmeter: primary == DistanceType::Axmeter || radii.axmeter.is_some(),
        }
    }
}

/// Applies the Pareto-admissible checkpoint update rule. Returns `true` if
/// the candidate should be expanded further (it strictly improved some
/// active metric), and overwrites `checkpoint` in place only when the
/// candidate is not worse on any active metric — a candidate that both
/// improves one metric and worsens another is still explored, but does not
/// clobber the recorded best values for metrics it regressed.
pub fn try_update(checkpoint: &mut Checkpoint, candidate: &Checkpoint, active: &ActiveMetrics) -> bool {
    let mut improved = false;
    let mut worse = false;
    let pairs = [
        (active.walking, candidate.walking, checkpoint.walking),
        (active.turns, candidate.turns as f32, checkpoint.turns as f32),
        (active.angle, candidate.fw_angle.min(candidate.bk_angle), checkpoint.fw_angle.min(checkpoint.bk_angle)),
        (active.axmeter, candidate.axmeter, checkpoint.axmeter),
    ];
    for (is_active, new, old) in pairs {
        if !is_active {
            continue;
        }
        if new < old {
            improved = true;
        } else if new > old {
            worse = true;
        }
    }
    if improved && !worse {
        *checkpoint = *candidate;
        true
    } else if improved && worse {
        true
    } else {
        false
    }
}

#[derive(Clone, Copy, Debug)]
struct State {
    i_line_crossing: u32,
    walking: f32,
    turns: u32,
    fw_angle: f32,
    bk_angle: f32,
    axmeter: f32,
    last_line_angle: f32,
}

pub struct BfsResult {
    /// Primary-metric distance at which each line was first reached, or
    /// `None` if unreached.
    pub line_reached: Vec<Option<f32>>,
    /// Primary-metric distance at which each point was reached.
    pub point_reached: Vec<Option<f32>>,
    pub reached_count: usize,
    pub reached_length: f32,
}

/// Runs the bounded BFS from `origin_line` (the origin's nearest line),
/// `origin_pos` being the parametric position along it, `dist_from_line`
/// pre-paid on the walking metric. `cancel` is polled between pops (§4.E).
pub fn run(
    graph: &AxialGraph,
    origin_line: u32,
    origin_pos: f32,
    dist_from_line: f32,
    primary: DistanceType,
    radii: &Radii,
    cancel: &dyn Fn() -> bool,
) -> BfsResult {
    let active = ActiveMetrics::from(primary, radii);
    let mut checkpoints = vec![Checkpoint::UNVISITED; graph.line_crossings.len()];
    let mut line_reached: Vec<Option<f32>> = vec![None; graph.line_count()];
    let mut point_reached: Vec<Option<f32>> = vec![None; graph.points.len()];
    let mut queue: VecDeque<State> = VecDeque::new();

    let origin_line_ref = graph.lines[origin_line as usize];
    let origin_primary_val = match primary {
        DistanceType::Steps => 0.0,
        DistanceType::Angular => 0.0,
        _ => dist_from_line,
    };
    mark_line(
        graph,
        &mut line_reached,
        &mut point_reached,
        origin_line,
        primary,
        origin_primary_val,
        dist_from_line,
        origin_pos,
    );

    let origin_base = origin_line_ref.i_first_crossing;
    for (offset, lc) in graph.line_crossings_of(origin_line).iter().enumerate() {
        let delta = (lc.line_pos - origin_pos).abs() + dist_from_line;
        if exceeds_radius(delta, 0, delta, delta, radii) {
            continue;
        }
        let lc_idx = origin_base + offset as u32;
        let cand = Checkpoint {
            walking: delta,
            turns: 0,
            fw_angle: 0.0,
            bk_angle: 0.0,
            axmeter: delta,
        };
        if try_update(&mut checkpoints[lc_idx as usize], &cand, &active) {
            queue.push_back(State {
                i_line_crossing: lc_idx,
                walking: delta,
                turns: 0,
                fw_angle: 0.0,
                bk_angle: 0.0,
                axmeter: delta,
                last_line_angle: origin_line_ref.angle_deg,
            });
        }
    }

    while let Some(state) = queue.pop_front() {
        if cancel() {
            break;
        }
        let lc = &graph.line_crossings[state.i_line_crossing as usize];
        let line_idx = lc.i_line;
        let line = graph.lines[line_idx as usize];

        let fwd = state.fw_angle + angle_diff_deg(state.last_line_angle, line.angle_deg).abs();
        let bwd = state.bk_angle + (180.0 - angle_diff_deg(state.last_line_angle, line.angle_deg).abs());

        let primary_val = match primary {
            DistanceType::Walking | DistanceType::Straight | DistanceType::Weights => {
                state.walking + (line.length * 0.5 - lc.line_pos).abs()
            }
            DistanceType::Steps => state.turns as f32,
            DistanceType::Angular => fwd.min(bwd),
            DistanceType::Axmeter => state.axmeter,
        };
        mark_line(
            graph,
            &mut line_reached,
            &mut point_reached,
            line_idx,
            primary,
            primary_val,
            state.walking,
            lc.line_pos,
        );

        // Every crossing on this line, including the one just arrived at
        // (a same-point turn costs nothing but still counts as a turn), is
        // a candidate to leave the line from. Leaving always hops through
        // the crossing's opposite half-edge, landing on the other line.
        for other_lc in graph.line_crossings_of(line_idx) {
            let delta = (other_lc.line_pos - lc.line_pos).abs();
            let walking = state.walking + delta;
            let turns = state.turns + 1;
            let axmeter = state.axmeter + line.length * (turns as f32 + 1.0);
            if exceeds_radius(walking, turns, fwd.min(bwd), axmeter, radii) {
                continue;
            }
            let next_idx = other_lc.i_opposite;
            let cand = Checkpoint {
                walking,
                turns,
                fw_angle: fwd,
                bk_angle: bwd,
                axmeter,
            };
            if try_update(&mut checkpoints[next_idx as usize], &cand, &active) {
                queue.push_back(State {
                    i_line_crossing: next_idx,
                    walking,
                    turns,
                    fw_angle: fwd,
                    bk_angle: bwd,
                    axmeter,
                    last_line_angle: line.angle_deg,
                });
            }
        }
    }

    let reached_count = line_reached.iter().filter(|r| r.is_some()).count();
    let reached_length: f32 = line_reached
        .iter()
        .zip(graph.lines.iter())
        .filter_map(|(r, l)| r.map(|_| l.length))
        .sum();

    BfsResult {
        line_reached,
        point_reached,
        reached_count,
        reached_length,
    }
}

fn exceeds_radius(walking: f32, turns: u32, angle: f32, axmeter: f32, radii: &Radii) -> bool {
    if let Some(cap) = radii.walking {
        if walking as f64 > cap {
            return true;
        }
    }
    if let Some(cap) = radii.steps {
        if turns > cap {
            return true;
        }
    }
    if let Some(cap) = radii.angular {
        if angle as f64 > cap {
            return true;
        }
    }
    if let Some(cap) = radii.axmeter {
        if axmeter as f64 > cap {
            return true;
        }
    }
    false
}

#[allow(clippy::too_many_arguments)]
fn mark_line(
    graph: &AxialGraph,
    line_reached: &mut [Option<f32>],
    point_reached: &mut [Option<f32>],
    line_idx: u32,
    _primary: DistanceType,
    primary_val: f32,
    walking: f32,
    line_pos: f32,
) {
    let slot = &mut line_reached[line_idx as usize];
    if slot.map_or(true, |d| primary_val < d) {
        *slot = Some(primary_val);
    }
    for &point_idx in graph.points_of(line_idx) {
        let point = &graph.points[point_idx as usize];
        let dist = walking + (point.line_pos - line_pos).abs() + point.dist_from_line;
        let slot = &mut point_reached[point_idx as usize];
        if slot.map_or(true, |d| dist < d) {
            *slot = Some(dist);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pareto_checkpoint_improve_no_worse_overwrites() {
        let mut cp = Checkpoint {
            walking: 10.0,
            turns: 2,
            fw_angle: 5.0,
            bk_angle: 5.0,
            axmeter: 10.0,
        };
        let active = ActiveMetrics {
            walking: true,
            turns: true,
            angle: false,
            axmeter: false,
        };
        let candidate = Checkpoint {
            walking: 8.0,
            turns: 2,
            ..cp
        };
        assert!(try_update(&mut cp, &candidate, &active));
        assert_eq!(cp.walking, 8.0);
    }

    #[test]
    fn pareto_checkpoint_improve_and_worse_does_not_overwrite() {
        let mut cp = Checkpoint {
            walking: 10.0,
            turns: 2,
            fw_angle: 5.0,
            bk_angle: 5.0,
            axmeter: 10.0,
        };
        let active = ActiveMetrics {
            walking: true,
            turns: true,
            angle: false,
            axmeter: false,
        };
        let candidate = Checkpoint {
            walking: 8.0,
            turns: 3,
            ..cp
        };
        assert!(try_update(&mut cp, &candidate, &active));
        assert_eq!(cp.walking, 10.0, "checkpoint must not be overwritten when a metric regresses");
        assert_eq!(cp.turns, 2);
    }

    #[test]
    fn no_improvement_returns_false() {
        let mut cp = Checkpoint {
            walking: 5.0,
            turns: 1,
            fw_angle: 0.0,
            bk_angle: 0.0,
            axmeter: 5.0,
        };
        let active = ActiveMetrics {
            walking: true,
            turns: false,
            angle: false,
            axmeter: false,
        };
        let candidate = Checkpoint { walking: 5.0, ..cp };
        assert!(!try_update(&mut cp, &candidate, &active));
    }
}
