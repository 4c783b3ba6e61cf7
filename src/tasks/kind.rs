//! Closed set of built-in task kinds and their setups

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::core::error::ColonyError;
use crate::core::types::{BodyPart, QueueTier};
use crate::production::CreepDefinition;

use super::builtin::{CreepTask, ReputationTask, Trigger};
use super::{Capability, Task};

use BodyPart::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    AttackController,
    Claim,
    Defense,
    Guard,
    LabTech,
    Mining,
    Pioneer,
    Reputation,
    Reserve,
    Robbing,
}

impl TaskKind {
    /// Default population, in registration order
    pub const BUILTIN: [TaskKind; 10] = [
        TaskKind::AttackController,
        TaskKind::Claim,
        TaskKind::Defense,
        TaskKind::Guard,
        TaskKind::LabTech,
        TaskKind::Mining,
        TaskKind::Pioneer,
        TaskKind::Reputation,
        TaskKind::Reserve,
        TaskKind::Robbing,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TaskKind::AttackController => "attackController",
            TaskKind::Claim => "claim",
            TaskKind::Defense => "defense",
            TaskKind::Guard => "guard",
            TaskKind::LabTech => "labTech",
            TaskKind::Mining => "mining",
            TaskKind::Pioneer => "pioneer",
            TaskKind::Reputation => "reputation",
            TaskKind::Reserve => "reserve",
            TaskKind::Robbing => "robbing",
        }
    }

    /// Instantiate the task
    pub fn build(self) -> Rc<dyn Task> {
        let name = self.name();
        match self {
            TaskKind::AttackController => Rc::new(
                CreepTask::new(
                    name,
                    Trigger::Flag("attack"),
                    CreepDefinition::new("antiControllerer", QueueTier::Medium)
                        .with_fixed_body(vec![Claim, Move])
                        .with_multi_body(vec![Claim, Move])
                        .with_max_multi(4),
                )
                .with_min_rcl(4)
                .with_max_range(6),
            ),
            TaskKind::Claim => Rc::new(
                CreepTask::new(
                    name,
                    Trigger::Flag("claim"),
                    CreepDefinition::new("claimer", QueueTier::Medium)
                        .with_fixed_body(vec![Claim, Move, Move]),
                )
                .with_min_rcl(3),
            ),
            TaskKind::Defense => Rc::new(
                CreepTask::new(
                    name,
                    Trigger::Invader,
                    CreepDefinition::new("defender", QueueTier::High)
                        .with_fixed_body(vec![Tough, Attack, Move])
                        .with_multi_body(vec![Attack, Move])
                        .with_max_multi(6),
                )
                .with_max_range(3)
                .allowing_target_room()
                .with_capability(Capability::CreepError),
            ),
            TaskKind::Guard => Rc::new(
                CreepTask::new(
                    name,
                    Trigger::Flag("guard"),
                    CreepDefinition::new("warrior", QueueTier::Medium)
                        .named("guard")
                        .with_fixed_body(vec![Move, Attack])
                        .with_multi_body(vec![Move, Attack])
                        .with_max_multi(5),
                )
                .with_max_range(4)
                .with_capability(Capability::CreepError),
            ),
            TaskKind::LabTech => Rc::new(
                CreepTask::new(
                    name,
                    Trigger::Flag("labs"),
                    CreepDefinition::new("labTech", QueueTier::Low)
                        .with_fixed_body(vec![Carry, Carry, Move])
                        .with_multi_body(vec![Carry, Move])
                        .with_max_multi(4),
                )
                .with_min_rcl(6)
                .with_max_range(0)
                .allowing_target_room()
                .with_capability(Capability::RoomDied),
            ),
            TaskKind::Mining => Rc::new(
                CreepTask::new(
                    name,
                    Trigger::Flag("mine"),
                    CreepDefinition::new("remoteMiner", QueueTier::Medium)
                        .with_fixed_body(vec![Work, Work, Carry, Move])
                        .with_multi_body(vec![Work, Work, Work, Move])
                        .with_min_energy(400)
                        .with_max_multi(4),
                )
                .with_max_range(2)
                .with_capability(Capability::RoomDied),
            ),
            TaskKind::Pioneer => Rc::new(
                CreepTask::new(
                    name,
                    Trigger::Flag("pioneer"),
                    CreepDefinition::new("pioneer", QueueTier::Low)
                        .with_fixed_body(vec![Work, Carry, Move, Move])
                        .with_multi_body(vec![Work, Carry, Move, Move])
                        .with_max_multi(4),
                )
                .with_count(2)
                .with_min_rcl(3)
                .with_capability(Capability::RoomDied),
            ),
            TaskKind::Reputation => Rc::new(ReputationTask),
            TaskKind::Reserve => Rc::new(
                CreepTask::new(
                    name,
                    Trigger::Flag("reserve"),
                    CreepDefinition::new("claimer", QueueTier::Low)
                        .named("reserver")
                        .with_fixed_body(vec![Claim, Move])
                        .with_multi_body(vec![Claim, Move])
                        .with_max_multi(1),
                )
                .with_min_rcl(4)
                .with_max_range(2)
                .with_capability(Capability::RoomDied),
            ),
            TaskKind::Robbing => Rc::new(
                CreepTask::new(
                    name,
                    Trigger::Flag("rob"),
                    CreepDefinition::new("robber", QueueTier::Low)
                        .with_fixed_body(vec![Carry, Move])
                        .with_multi_body(vec![Carry, Move])
                        .with_max_multi(8),
                )
                .with_max_range(3),
            ),
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TaskKind {
    type Err = ColonyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskKind::BUILTIN
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ColonyError::UnknownTask(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in TaskKind::BUILTIN {
            assert_eq!(kind.name().parse::<TaskKind>().ok(), Some(kind));
        }
    }

    #[test]
    fn test_unknown_name() {
        let err = "farming".parse::<TaskKind>().unwrap_err();
        assert!(matches!(err, ColonyError::UnknownTask(name) if name == "farming"));
    }

    #[test]
    fn test_built_task_carries_kind_name() {
        for kind in TaskKind::BUILTIN {
            assert_eq!(kind.build().name(), kind.name());
        }
    }

    #[test]
    fn test_reputation_declares_no_creep_handlers() {
        let caps = TaskKind::Reputation.build().capabilities();
        assert!(!caps.contains(Capability::CreepDied));
        assert!(!caps.contains(Capability::FlagFound));
    }
}
