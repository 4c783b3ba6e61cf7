//! Task registry - ordered task list and its event wiring

use std::rc::Rc;

use crate::core::error::Result;
use crate::events::EventBus;

use super::kind::TaskKind;
use super::{dispatch, Task, TaskContext};

/// Registered tasks, in insertion order
#[derive(Default)]
pub struct TaskRegistry {
    tasks: Vec<Rc<dyn Task>>,
    registered: bool,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append tasks; they keep insertion order for flush and dispatch
    ///
    /// Tasks added after [`TaskRegistry::register`] are never subscribed.
    pub fn add_tasks(&mut self, tasks: impl IntoIterator<Item = Rc<dyn Task>>) {
        let before = self.tasks.len();
        self.tasks.extend(tasks);
        if self.registered && self.tasks.len() > before {
            tracing::warn!(
                added = self.tasks.len() - before,
                "Tasks added after registration will receive no events"
            );
        }
    }

    /// Add the built-in task set
    pub fn populate(&mut self) {
        self.add_tasks(TaskKind::BUILTIN.into_iter().map(TaskKind::build));
    }

    /// Resolve task names and add them in the given order
    ///
    /// Nothing is added if any name is unknown.
    pub fn install_task(&mut self, names: &[&str]) -> Result<()> {
        let kinds = names
            .iter()
            .map(|name| name.parse::<TaskKind>())
            .collect::<Result<Vec<_>>>()?;
        self.add_tasks(kinds.into_iter().map(TaskKind::build));
        Ok(())
    }

    /// Run every task's flush, in insertion order
    pub fn flush(&self, ctx: &mut TaskContext<'_>) {
        for task in &self.tasks {
            task.flush(ctx);
        }
    }

    /// Subscribe every task to the channels of its declared capabilities
    ///
    /// Only the first call wires anything; later calls return `false`.
    pub fn register(&mut self, bus: &mut EventBus) -> bool {
        if self.registered {
            tracing::warn!("Tasks already registered, ignoring repeated registration");
            return false;
        }

        for task in &self.tasks {
            task.register(bus);
            for capability in task.capabilities().iter() {
                for &channel in capability.channels() {
                    let handler = Rc::clone(task);
                    bus.on(channel, task.name(), move |ctx, event| {
                        dispatch(handler.as_ref(), ctx, event)
                    });
                }
            }
        }

        self.registered = true;
        tracing::debug!(tasks = self.tasks.len(), "Tasks registered");
        true
    }

    /// Same tasks, not yet registered with any bus
    pub fn fresh(&self) -> TaskRegistry {
        TaskRegistry {
            tasks: self.tasks.clone(),
            registered: false,
        }
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn get(&self, name: &str) -> Option<&Rc<dyn Task>> {
        self.tasks.iter().find(|task| task.name() == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tasks.iter().map(|task| task.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ColonyError;
    use crate::events::Channel;

    #[test]
    fn test_populate_order() {
        let mut registry = TaskRegistry::new();
        registry.populate();
        assert_eq!(
            registry.names(),
            TaskKind::BUILTIN.iter().map(|k| k.name()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_install_task_unknown_name_adds_nothing() {
        let mut registry = TaskRegistry::new();
        let result = registry.install_task(&["mining", "farming"]);
        assert!(matches!(result, Err(ColonyError::UnknownTask(name)) if name == "farming"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_install_task_appends() {
        let mut registry = TaskRegistry::new();
        registry.install_task(&["guard", "mining"]).unwrap();
        assert_eq!(registry.names(), vec!["guard", "mining"]);
        assert!(registry.get("mining").is_some());
    }

    #[test]
    fn test_register_once() {
        let mut registry = TaskRegistry::new();
        registry.install_task(&["mining"]).unwrap();
        let mut bus = EventBus::new();

        assert!(registry.register(&mut bus));
        assert!(!registry.register(&mut bus));
        assert_eq!(bus.subscribers(Channel::CreepDied), vec!["mining"]);
        assert_eq!(bus.subscribers(Channel::PredictedRenewal), vec!["mining"]);
    }

    #[test]
    fn test_install_after_register_is_not_subscribed() {
        let mut registry = TaskRegistry::new();
        registry.install_task(&["mining"]).unwrap();
        let mut bus = EventBus::new();
        registry.register(&mut bus);

        registry.install_task(&["guard"]).unwrap();
        assert_eq!(registry.names(), vec!["mining", "guard"]);
        assert_eq!(bus.subscribers(Channel::CreepDied), vec!["mining"]);
    }

    #[test]
    fn test_register_skips_undeclared_channels() {
        let mut registry = TaskRegistry::new();
        registry.install_task(&["reputation"]).unwrap();
        let mut bus = EventBus::new();
        registry.register(&mut bus);

        assert_eq!(bus.subscriber_count(Channel::NewInvader), 1);
        assert_eq!(bus.subscriber_count(Channel::CreepDied), 0);
        assert_eq!(bus.subscriber_count(Channel::FlagFound), 0);
    }
}
