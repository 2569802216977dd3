// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::ops::AddAssign;
use std::time::Instant;

use crate::errors::{ChildFailure, FailureStrategy, ProcessError, ProcessorError};
use crate::observability::messages::group::{
    GroupChildFailed, GroupExecutionCompleted, GroupExecutionStarted,
};
use crate::observability::messages::processor::{
    ProcessorExecutionCompleted, ProcessorExecutionFailed, ProcessorExecutionStarted,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{NameStyle, ParamSchema, Processor};

use super::{Context, Params, ProcessorBase};

/// A processor made of other processors, run in insertion order against the
/// same context.
///
/// Children are owned exclusively by the group. Only processors can be
/// added; anything else is rejected at compile time:
///
/// ```compile_fail
/// use pocketchemist::processors::GroupProcessor;
///
/// let mut group = GroupProcessor::new(None);
/// group.add(42);
/// ```
///
/// ```
/// use pocketchemist::processors::{Context, GroupProcessor};
/// use pocketchemist::traits::Processor;
///
/// let mut inner = GroupProcessor::named("Inner");
/// inner += GroupProcessor::new(None);
///
/// let mut root = GroupProcessor::named("Root");
/// root += inner;
///
/// assert_eq!(root.len(), 1);
/// root.process(&mut Context::new()).unwrap();
/// ```
pub struct GroupProcessor {
    base: ProcessorBase,
    processors: Vec<Box<dyn Processor>>,
    failure_strategy: FailureStrategy,
}

impl ParamSchema for GroupProcessor {
    const TYPE_NAME: &'static str = "GroupProcessor";
}

impl GroupProcessor {
    pub fn new(name: Option<String>) -> Self {
        Self {
            base: ProcessorBase::bare(Self::TYPE_NAME, name),
            processors: Vec::new(),
            failure_strategy: FailureStrategy::default(),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new(Some(name.into()))
    }

    /// Construct from keyword parameters like any other processor.
    pub fn with_params(name: Option<String>, kwargs: Params) -> Result<Self, ProcessorError> {
        Ok(Self {
            base: ProcessorBase::new::<Self>(name, kwargs)?,
            processors: Vec::new(),
            failure_strategy: FailureStrategy::default(),
        })
    }

    pub fn with_failure_strategy(mut self, failure_strategy: FailureStrategy) -> Self {
        self.failure_strategy = failure_strategy;
        self
    }

    pub fn failure_strategy(&self) -> FailureStrategy {
        self.failure_strategy
    }

    pub fn set_failure_strategy(&mut self, failure_strategy: FailureStrategy) {
        self.failure_strategy = failure_strategy;
    }

    /// Append a processor; it runs after every processor already added.
    pub fn add<P: Processor + 'static>(&mut self, processor: P) -> &mut Self {
        self.add_boxed(Box::new(processor))
    }

    pub fn add_boxed(&mut self, processor: Box<dyn Processor>) -> &mut Self {
        self.processors.push(processor);
        self
    }

    pub fn processors(&self) -> &[Box<dyn Processor>] {
        &self.processors
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    fn run_child(&self, processor: &dyn Processor, context: &mut Context) -> Result<(), ProcessError> {
        ProcessorExecutionStarted {
            processor_id: processor.name(),
            context_entries: context.len(),
        }
        .log();

        let start_time = Instant::now();
        let result = processor.process(context);

        match &result {
            Ok(()) => ProcessorExecutionCompleted {
                processor_id: processor.name(),
                context_entries: context.len(),
                duration: start_time.elapsed(),
            }
            .log(),
            Err(error) => ProcessorExecutionFailed {
                processor_id: processor.name(),
                error,
            }
            .log(),
        }

        result
    }
}

impl<P: Processor + 'static> AddAssign<P> for GroupProcessor {
    fn add_assign(&mut self, processor: P) {
        self.add(processor);
    }
}

impl Processor for GroupProcessor {
    fn base(&self) -> &ProcessorBase {
        &self.base
    }

    fn process(&self, context: &mut Context) -> Result<(), ProcessError> {
        GroupExecutionStarted {
            group: self.name(),
            child_count: self.processors.len(),
            failure_strategy: self.failure_strategy,
        }
        .log();

        let start_time = Instant::now();
        let mut failures = Vec::new();

        for (position, processor) in self.processors.iter().enumerate() {
            let index = position + 1;
            if let Err(error) = self.run_child(processor.as_ref(), context) {
                GroupChildFailed {
                    group: self.name(),
                    index,
                    child: processor.name(),
                    failure_strategy: self.failure_strategy,
                }
                .log();

                match self.failure_strategy {
                    FailureStrategy::FailFast => {
                        return Err(ProcessError::ChildFailed {
                            group: self.name().to_string(),
                            index,
                            child: processor.name().to_string(),
                            source: Box::new(error),
                        });
                    }
                    FailureStrategy::ContinueOnError | FailureStrategy::BestEffort => {
                        failures.push(ChildFailure {
                            index,
                            child: processor.name().to_string(),
                            error,
                        });
                    }
                }
            }
        }

        GroupExecutionCompleted {
            group: self.name(),
            child_count: self.processors.len(),
            failed_count: failures.len(),
            duration: start_time.elapsed(),
        }
        .log();

        if failures.is_empty() || self.failure_strategy == FailureStrategy::BestEffort {
            return Ok(());
        }

        Err(ProcessError::ChildrenFailed {
            group: self.name().to_string(),
            failures,
        })
    }

    fn describe(&self) -> String {
        format!("{}(number_processors={})", self.name(), self.processors.len())
    }

    fn render_styled(
        &self,
        level: usize,
        indent_width: usize,
        item_number: Option<usize>,
        style: NameStyle,
    ) -> Vec<String> {
        let mut lines = vec![self.base.render_line_styled(level, indent_width, item_number, style)];
        for (position, processor) in self.processors.iter().enumerate() {
            lines.extend(processor.render_styled(level + 1, indent_width, Some(position + 1), style));
        }
        lines
    }

    fn as_group_mut(&mut self) -> Option<&mut GroupProcessor> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;
    use std::sync::{Arc, Mutex};

    type CallLog = Arc<Mutex<Vec<(String, usize)>>>;

    /// Records its name and the address of the context it was handed.
    struct Recording {
        base: ProcessorBase,
        log: CallLog,
        fail: bool,
    }

    impl ParamSchema for Recording {
        const TYPE_NAME: &'static str = "Recording";
        const OPTIONAL_PARAMS: &'static [&'static str] = &["gain"];
    }

    impl Recording {
        fn new(name: &str, log: &CallLog) -> Self {
            Self {
                base: ProcessorBase::new::<Self>(Some(name.to_string()), Params::new()).unwrap(),
                log: Arc::clone(log),
                fail: false,
            }
        }

        fn failing(name: &str, log: &CallLog) -> Self {
            Self {
                fail: true,
                ..Self::new(name, log)
            }
        }
    }

    impl Processor for Recording {
        fn base(&self) -> &ProcessorBase {
            &self.base
        }

        fn process(&self, context: &mut Context) -> Result<(), ProcessError> {
            let address = context as *const Context as usize;
            self.log.lock().unwrap().push((self.name().to_string(), address));

            if self.fail {
                return Err(ProcessError::Failed {
                    processor: self.name().to_string(),
                    reason: "simulated failure".to_string(),
                });
            }

            let mut seen = context.get::<Vec<String>>("seen").cloned().unwrap_or_default();
            seen.push(self.name().to_string());
            context.insert("seen", seen);
            Ok(())
        }
    }

    fn names(log: &CallLog) -> Vec<String> {
        log.lock().unwrap().iter().map(|(n, _)| n.clone()).collect()
    }

    #[test]
    fn test_children_run_in_order_with_same_context() {
        let log = CallLog::default();
        let mut group = GroupProcessor::new(None);
        group.add(Recording::new("A", &log));
        group.add(Recording::new("B", &log));
        group.add(Recording::new("C", &log));

        let mut context = Context::new();
        let expected_address = &context as *const Context as usize;
        group.process(&mut context).unwrap();

        let calls = log.lock().unwrap().clone();
        assert_eq!(names(&log), vec!["A", "B", "C"]);
        assert!(calls.iter().all(|(_, address)| *address == expected_address));
        assert_eq!(
            context.get::<Vec<String>>("seen"),
            Some(&vec!["A".to_string(), "B".to_string(), "C".to_string()])
        );
    }

    #[test]
    fn test_nested_groups_run_depth_first() {
        let log = CallLog::default();

        let mut inner = GroupProcessor::named("Inner");
        inner += Recording::new("B", &log);
        inner += Recording::new("C", &log);

        let mut root = GroupProcessor::named("Root");
        root += Recording::new("A", &log);
        root += inner;
        root += Recording::new("D", &log);

        root.process(&mut Context::new()).unwrap();
        assert_eq!(names(&log), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_empty_group_is_a_no_op() {
        let group = GroupProcessor::new(None);
        let mut context = Context::new();
        assert!(group.process(&mut context).is_ok());
        assert!(context.is_empty());
    }

    #[test]
    fn test_fail_fast_stops_at_first_failure() {
        let log = CallLog::default();
        let mut group = GroupProcessor::named("Main");
        group += Recording::new("A", &log);
        group += Recording::failing("B", &log);
        group += Recording::new("C", &log);

        let error = group.process(&mut Context::new()).unwrap_err();

        assert_eq!(names(&log), vec!["A", "B"]);
        match error {
            ProcessError::ChildFailed { group, index, child, source } => {
                assert_eq!(group, "Main");
                assert_eq!(index, 2);
                assert_eq!(child, "B");
                assert!(matches!(*source, ProcessError::Failed { .. }));
            }
            other => panic!("Expected ChildFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_continue_on_error_reports_every_failure() {
        let log = CallLog::default();
        let mut group = GroupProcessor::named("Main").with_failure_strategy(FailureStrategy::ContinueOnError);
        group += Recording::failing("A", &log);
        group += Recording::new("B", &log);
        group += Recording::failing("C", &log);

        let error = group.process(&mut Context::new()).unwrap_err();

        assert_eq!(names(&log), vec!["A", "B", "C"]);
        match error {
            ProcessError::ChildrenFailed { failures, .. } => {
                let indices: Vec<usize> = failures.iter().map(|f| f.index).collect();
                assert_eq!(indices, vec![1, 3]);
            }
            other => panic!("Expected ChildrenFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_best_effort_swallows_failures() {
        let log = CallLog::default();
        let mut group = GroupProcessor::new(None).with_failure_strategy(FailureStrategy::BestEffort);
        group += Recording::failing("A", &log);
        group += Recording::new("B", &log);

        let mut context = Context::new();
        assert!(group.process(&mut context).is_ok());
        assert_eq!(names(&log), vec!["A", "B"]);
        assert_eq!(context.get::<Vec<String>>("seen"), Some(&vec!["B".to_string()]));
    }

    #[test]
    fn test_boxed_children_and_describe() {
        let log = CallLog::default();
        let mut group = GroupProcessor::named("Main");
        group += Recording::new("A", &log);
        group.add_boxed(Box::new(Recording::new("B", &log)));

        assert_eq!(group.len(), 2);
        assert_eq!(group.describe(), "Main(number_processors=2)");
        assert_eq!(format!("{:?}", group.processors()[0]), "A");
    }

    #[test]
    fn test_as_group_mut() {
        let log = CallLog::default();
        let mut group: Box<dyn Processor> = Box::new(GroupProcessor::new(None));
        group
            .as_group_mut()
            .expect("group exposes the group capability")
            .add(Recording::new("A", &log));

        let mut leaf: Box<dyn Processor> = Box::new(Recording::new("B", &log));
        assert!(leaf.as_group_mut().is_none());
        assert_eq!(group.describe(), "GroupProcessor(number_processors=1)");
    }

    #[test]
    fn test_render_tree() {
        let log = CallLog::default();

        let mut inner = GroupProcessor::named("Inner");
        inner += Recording {
            base: ProcessorBase::new::<Recording>(None, params! { "gain" => 2.5 }).unwrap(),
            log: Arc::clone(&log),
            fail: false,
        };

        let mut root = GroupProcessor::named("Root");
        root += Recording::new("A", &log);
        root += inner;

        assert_eq!(
            root.render(0, 2, None),
            vec![
                "Root".to_string(),
                "  1. A".to_string(),
                "  2. Inner".to_string(),
                "    1. Recording(gain=2.5)".to_string(),
            ]
        );
        assert_eq!(root.processors()[1].get_param("gain"), None);
        assert_eq!(
            root.processors()[1].render(0, 2, None)[1].trim(),
            "1. Recording(gain=2.5)"
        );

        let styled = root.render_styled(0, 2, None, NameStyle::Highlighted);
        assert_eq!(styled.len(), 4);
        assert_eq!(styled[0], NameStyle::Highlighted.apply("Root"));
        assert!(styled[3].starts_with("    1. "));
        assert!(styled[3].contains(&NameStyle::Highlighted.apply("Recording")));
    }
}
