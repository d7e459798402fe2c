//! Surveillance action decoding.

use overwatch_agents::Direction;
use overwatch_core::ActionError;

/// Actions for the surveillance group for one step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Actions {
    /// One action index per surveillance agent, in agent order.
    PerAgent(Vec<usize>),
    /// A single index into the joint action space, unravelled with the
    /// first agent as the most significant digit.
    Joint(u64),
}

impl From<Vec<usize>> for Actions {
    fn from(actions: Vec<usize>) -> Self {
        Actions::PerAgent(actions)
    }
}

impl From<&[usize]> for Actions {
    fn from(actions: &[usize]) -> Self {
        Actions::PerAgent(actions.to_vec())
    }
}

impl From<u64> for Actions {
    fn from(joint: u64) -> Self {
        Actions::Joint(joint)
    }
}

impl Actions {
    /// Decode into one [`Direction`] per agent, given each agent's
    /// action-space size.
    pub fn decode(&self, act_dims: &[usize]) -> Result<Vec<Direction>, ActionError> {
        let indices = match self {
            Actions::PerAgent(actions) => {
                if actions.len() != act_dims.len() {
                    return Err(ActionError::WrongActionCount {
                        expected: act_dims.len(),
                        got: actions.len(),
                    });
                }
                actions.clone()
            }
            Actions::Joint(joint) => unravel(*joint, act_dims)?,
        };
        indices
            .into_iter()
            .zip(act_dims)
            .enumerate()
            .map(|(agent, (action, &n_actions))| {
                if action >= n_actions {
                    return Err(ActionError::InvalidAction {
                        agent,
                        action,
                        n_actions,
                    });
                }
                Direction::from_index(action).ok_or(ActionError::InvalidAction {
                    agent,
                    action,
                    n_actions,
                })
            })
            .collect()
    }
}

/// Size of the joint action space, saturating at `u64::MAX`.
pub fn joint_size(act_dims: &[usize]) -> u64 {
    act_dims
        .iter()
        .try_fold(1u64, |acc, &d| acc.checked_mul(d as u64))
        .unwrap_or(u64::MAX)
}

/// Split a joint index into per-agent indices, C order: the last agent
/// varies fastest.
pub fn unravel(joint: u64, act_dims: &[usize]) -> Result<Vec<usize>, ActionError> {
    let size = joint_size(act_dims);
    if joint >= size {
        return Err(ActionError::JointActionOutOfRange { action: joint, size });
    }
    let mut rest = joint;
    let mut out = vec![0; act_dims.len()];
    for (slot, &d) in out.iter_mut().zip(act_dims).rev() {
        let d = d as u64;
        *slot = (rest % d) as usize;
        rest /= d;
    }
    Ok(out)
}
