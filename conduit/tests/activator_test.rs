mod common;

use std::collections::HashSet;
use std::sync::Arc;

use common::{names, MockConstructor, MockDriver, RunBehavior};
use conduit::{
    ActivationError, Activator, ConstructorRegistry, DriverConstructor, MemoryQueue, Pipeline,
    ProcessorConfig, ProcessorError,
};

fn activator(constructors: Vec<Arc<MockConstructor>>) -> Activator {
    let mut registry = ConstructorRegistry::new();
    for constructor in constructors {
        let constructor: Arc<dyn DriverConstructor> = constructor;
        registry.register(constructor);
    }
    Activator::new(ProcessorConfig::default().with_worker_count(2).with_run_timeout(1), registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_registry_by_kind() {
        let mut registry = ConstructorRegistry::new();
        assert!(registry.register(Arc::new(MockConstructor::new("amqp"))).is_none());
        assert!(registry.register(Arc::new(MockConstructor::new("memory"))).is_none());
        assert!(registry.register(Arc::new(MockConstructor::new("amqp"))).is_some());

        assert_eq!(registry.kinds(), vec!["amqp", "memory"]);
        assert!(registry.contains("memory"));
        assert!(registry.get("sqs").is_none());
    }

    #[test]
    fn test_activate_builds_every_pipeline() {
        let memory = Arc::new(MockConstructor::new("memory"));
        let amqp = Arc::new(MockConstructor::new("amqp"));
        let activator = activator(vec![memory.clone(), amqp.clone()]);
        let (commands, _rx) = flume::unbounded();

        let pipelines = vec![
            Pipeline::new("local", "memory"),
            Pipeline::new("emails", "amqp").with("prefetch", 10),
        ];
        let drivers = activator
            .activate(pipelines, &names(&["local"]), Arc::new(MemoryQueue::new()), commands)
            .unwrap();

        assert_eq!(drivers.names(), vec!["emails", "local"]);
        assert_eq!(memory.runs(), 1);
        assert_eq!(amqp.runs(), 0);
        assert_eq!(
            drivers.get_as::<MockDriver>("emails").unwrap().config_key,
            "jobs.pipelines.emails"
        );
    }

    #[test]
    fn test_activate_reports_unknown_driver_and_duplicates() {
        let memory = Arc::new(MockConstructor::new("memory"));
        let activator = activator(vec![memory.clone()]);
        let (commands, _rx) = flume::unbounded();

        let pipelines = vec![
            Pipeline::new("local", "memory"),
            Pipeline::new("local", "memory"),
            Pipeline::new("remote", "kafka"),
        ];
        let result = activator.activate(pipelines, &HashSet::new(), Arc::new(MemoryQueue::new()), commands);

        let errors = match result {
            Err(ProcessorError::ActivationFailed(errors)) => errors,
            other => panic!("unexpected result: {:?}", other),
        };
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            errors[0].as_ref(),
            ActivationError::DuplicatePipeline { pipeline } if pipeline == "local"
        ));
        assert!(matches!(
            errors[1].as_ref(),
            ActivationError::UnknownDriver { pipeline, driver } if pipeline == "remote" && driver == "kafka"
        ));
        // the first declaration still went through
        assert_eq!(memory.constructed(), 1);
    }

    #[test]
    fn test_activate_collects_construction_and_run_failures() {
        let memory = Arc::new(
            MockConstructor::new("memory")
                .failing("broken", "connect refused")
                .with_behavior(RunBehavior::UntilDone),
        );
        let activator = activator(vec![memory.clone()]);
        let (commands, _rx) = flume::unbounded();

        let pipelines = vec![Pipeline::new("broken", "memory"), Pipeline::new("slow", "memory")];
        let result = activator.activate(
            pipelines,
            &names(&["broken", "slow"]),
            Arc::new(MemoryQueue::new()),
            commands,
        );

        let err = result.unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("2 pipeline(s) failed to activate"), "{}", message);
        assert!(message.contains("broken: connect refused"), "{}", message);
        assert!(message.contains("slow: context deadline exceeded"), "{}", message);
    }
}
