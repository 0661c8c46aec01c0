//! # Integration Tests
//!
//! End-to-end pipeline tests for the operator execution core:
//! - emission contract properties (expansion, atomicity, channel ordering)
//! - multi-stage synchronous pipelines with tagged side outputs
//! - fault propagation through the emission recursion

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        // Verify the contracts crate surface is reachable
        let _ = contracts::Packet::new("probe");
    }
}

#[cfg(test)]
mod emission_contract_tests {
    use contracts::{FlowError, OperatorConfig, Packet, SharedCollector, Transform, Value};
    use operators::{CaptureOperator, FlatMapOperator, Operator, RoutingTable};

    /// Delegate that splits text into words through the collector, routing
    /// short words to the "short" side output.
    struct WordSplit {
        out: Option<SharedCollector>,
    }

    impl WordSplit {
        fn new() -> Self {
            Self { out: None }
        }
    }

    impl Transform for WordSplit {
        fn execute(&mut self, value: Value) -> Result<Option<Value>, FlowError> {
            let line = match value {
                Value::Text(line) => line,
                other => return Err(FlowError::transform(format!("expected text, got {other:?}"))),
            };
            let out = self
                .out
                .as_ref()
                .ok_or_else(|| FlowError::transform("collector not injected"))?;
            let mut out = out.lock().unwrap();
            for word in line.split_whitespace() {
                if word.len() < 4 {
                    out.collect_tagged(word, "short");
                } else {
                    out.collect(word);
                }
            }
            Ok(None)
        }

        fn uses_collector(&self) -> bool {
            true
        }

        fn insert_collector(&mut self, collector: SharedCollector) {
            self.out = Some(collector);
        }
    }

    fn texts(packets: &[Packet]) -> Vec<String> {
        packets
            .iter()
            .map(|p| p.value().as_text().unwrap().to_string())
            .collect()
    }

    /// Delegate returning a sequence of N items causes exactly N default
    /// channel emissions in iteration order.
    #[test]
    fn test_sequence_expansion_order() {
        let (handle, sink) = CaptureOperator::spawn("sink");
        let mut routes = RoutingTable::new();
        routes.register_default(handle);

        let expand = |_: Value| -> Result<Option<Value>, FlowError> {
            Ok(Some(Value::Seq(vec![
                Value::from("a"),
                Value::from("b"),
                Value::from("c"),
            ])))
        };
        let mut op = FlatMapOperator::new(
            OperatorConfig::named("expander"),
            Box::new(expand),
            routes,
        )
        .unwrap();

        op.receive(Packet::new("ignored")).unwrap();

        let captured = sink.lock().unwrap().clone();
        assert_eq!(texts(&captured), vec!["a", "b", "c"]);
        assert!(captured.iter().all(|p| p.tag().is_none()));
    }

    /// A returned plain text value is one emission, never per-character.
    #[test]
    fn test_text_is_atomic() {
        let (handle, sink) = CaptureOperator::spawn("sink");
        let mut routes = RoutingTable::new();
        routes.register_default(handle);

        let echo = |v: Value| -> Result<Option<Value>, FlowError> { Ok(Some(v)) };
        let mut op =
            FlatMapOperator::new(OperatorConfig::named("echo"), Box::new(echo), routes).unwrap();

        op.receive(Packet::new("hello")).unwrap();

        assert_eq!(texts(&sink.lock().unwrap()), vec!["hello"]);
    }

    /// Collector items reach their channels in collection order, and the
    /// buffer stays empty between invocations.
    #[test]
    fn test_collector_routing_and_reset() {
        let (long_handle, long_sink) = CaptureOperator::spawn("long_words");
        let (short_handle, short_sink) = CaptureOperator::spawn("short_words");
        let mut routes = RoutingTable::new();
        routes.register_default(long_handle);
        routes.register(Some("short".into()), short_handle);

        let mut op = FlatMapOperator::new(
            OperatorConfig::named("splitter"),
            Box::new(WordSplit::new()),
            routes,
        )
        .unwrap();

        op.receive(Packet::new("the quick brown fox")).unwrap();

        assert_eq!(texts(&long_sink.lock().unwrap()), vec!["quick", "brown"]);
        assert_eq!(texts(&short_sink.lock().unwrap()), vec!["the", "fox"]);
        assert!(op.buffered().is_empty());

        // A do-nothing invocation still finds an empty buffer
        op.receive(Packet::new("")).unwrap();
        assert!(op.buffered().is_empty());
        assert_eq!(op.collector_stats().buffered, 0);
    }

    /// Return-channel items strictly precede collector-channel items.
    #[test]
    fn test_combined_channel_ordering() {
        struct Both {
            out: Option<SharedCollector>,
        }
        impl Transform for Both {
            fn execute(&mut self, _: Value) -> Result<Option<Value>, FlowError> {
                self.out.as_ref().unwrap().lock().unwrap().collect("r");
                Ok(Some(Value::Seq(vec![Value::from("p"), Value::from("q")])))
            }
            fn uses_collector(&self) -> bool {
                true
            }
            fn insert_collector(&mut self, collector: SharedCollector) {
                self.out = Some(collector);
            }
        }

        let (handle, sink) = CaptureOperator::spawn("sink");
        let mut routes = RoutingTable::new();
        routes.register_default(handle);

        let mut op = FlatMapOperator::new(
            OperatorConfig::named("both_channels"),
            Box::new(Both { out: None }),
            routes,
        )
        .unwrap();

        op.receive(Packet::new("x")).unwrap();

        assert_eq!(texts(&sink.lock().unwrap()), vec!["p", "q", "r"]);
    }

    /// Emitting to a tag with zero downstreams is silent, never a fault.
    #[test]
    fn test_routing_miss_is_silent() {
        let mut op = FlatMapOperator::new(
            OperatorConfig::named("terminal"),
            Box::new(WordSplit::new()),
            RoutingTable::new(),
        )
        .unwrap();

        assert!(op.receive(Packet::new("every word is dropped")).is_ok());
        assert_eq!(op.metrics().routing_misses, 4);
        assert_eq!(op.metrics().faults, 0);
    }
}

#[cfg(test)]
mod pipeline_tests {
    use contracts::{FlowError, OperatorConfig, Packet, SharedCollector, Transform, Value};
    use observability::FlowMetricsAggregator;
    use operators::{
        CaptureOperator, DownstreamHandle, FailingOperator, FilterOperator, FlatMapOperator,
        MapOperator, Operator, RoutingTable,
    };

    struct SplitWords {
        out: Option<SharedCollector>,
    }

    impl Transform for SplitWords {
        fn execute(&mut self, value: Value) -> Result<Option<Value>, FlowError> {
            if let (Value::Text(line), Some(out)) = (value, &self.out) {
                out.lock().unwrap().collect_multiple(line.split_whitespace());
            }
            Ok(None)
        }
        fn uses_collector(&self) -> bool {
            true
        }
        fn insert_collector(&mut self, collector: SharedCollector) {
            self.out = Some(collector);
        }
    }

    fn uppercase(value: Value) -> Result<Option<Value>, FlowError> {
        match value {
            Value::Text(s) => Ok(Some(Value::Text(s.to_uppercase()))),
            other => Ok(Some(other)),
        }
    }

    fn routed_to(handle: DownstreamHandle) -> RoutingTable {
        let mut routes = RoutingTable::new();
        routes.register_default(handle);
        routes
    }

    /// Three-stage chain: split -> filter -> uppercase -> capture, delivered
    /// fully synchronously within a single upstream `receive`.
    #[test]
    fn test_e2e_word_pipeline() {
        let (capture_handle, sink) = CaptureOperator::spawn("sink");

        let upper = MapOperator::new(
            OperatorConfig::named("upper"),
            Box::new(uppercase),
            routed_to(capture_handle),
        )
        .unwrap();
        let (upper_handle, _) = DownstreamHandle::wrap(upper);

        let long_only = FilterOperator::new(
            OperatorConfig::named("long_only"),
            Box::new(|v: &Value| -> Result<bool, FlowError> {
                Ok(v.as_text().map(|s| s.len() >= 4).unwrap_or(false))
            }),
            routed_to(upper_handle),
        )
        .unwrap();
        let (filter_handle, filter_shared) = DownstreamHandle::wrap(long_only);

        let mut splitter = FlatMapOperator::new(
            OperatorConfig::named("splitter"),
            Box::new(SplitWords { out: None }),
            routed_to(filter_handle),
        )
        .unwrap();

        splitter.receive(Packet::new("the quick brown fox")).unwrap();

        // Everything already arrived by the time receive returned
        let words: Vec<String> = sink
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.value().as_text().unwrap().to_string())
            .collect();
        assert_eq!(words, vec!["QUICK", "BROWN"]);

        let stats = filter_shared.lock().unwrap().filter_stats();
        assert_eq!(stats.total_input, 4);
        assert_eq!(stats.passed, 2);
        assert_eq!(stats.filtered, 2);
    }

    /// Packets delivered to one instance are processed strictly FIFO.
    #[test]
    fn test_fifo_per_instance() {
        let (handle, sink) = CaptureOperator::spawn("sink");
        let mut op = MapOperator::new(
            OperatorConfig::named("pass"),
            Box::new(|v: Value| -> Result<Option<Value>, FlowError> { Ok(Some(v)) }),
            routed_to(handle),
        )
        .unwrap();

        for i in 0..10i64 {
            op.receive(Packet::new(i)).unwrap();
        }

        let seen: Vec<i64> = sink
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.value().as_int().unwrap())
            .collect();
        assert_eq!(seen, (0..10).collect::<Vec<i64>>());
    }

    /// Two downstreams on one channel both get every item, in registration
    /// order; a handle registered twice delivers once.
    #[test]
    fn test_fanout_and_set_semantics() {
        let (first, first_sink) = CaptureOperator::spawn("first");
        let (second, second_sink) = CaptureOperator::spawn("second");

        let mut routes = RoutingTable::new();
        routes.register_default(first.clone());
        routes.register_default(second);
        routes.register_default(first); // same instance, no-op

        let mut op = MapOperator::new(
            OperatorConfig::named("fanout"),
            Box::new(|v: Value| -> Result<Option<Value>, FlowError> { Ok(Some(v)) }),
            routes,
        )
        .unwrap();

        op.receive(Packet::new("x")).unwrap();

        assert_eq!(first_sink.lock().unwrap().len(), 1);
        assert_eq!(second_sink.lock().unwrap().len(), 1);
    }

    /// A fault deep in the pipeline aborts the upstream packet, but items
    /// emitted before the failure point stay delivered.
    #[test]
    fn test_downstream_fault_aborts_packet() {
        let (bomb_handle, _) = DownstreamHandle::wrap(FailingOperator::new("bomb", "sink broke"));
        let (ok_handle, ok_sink) = CaptureOperator::spawn("ok_sink");

        // First downstream succeeds, second fails: registration order
        // means the capture sees the item before the fault surfaces.
        let mut routes = RoutingTable::new();
        routes.register_default(ok_handle);
        routes.register_default(bomb_handle);

        let expand = |_: Value| -> Result<Option<Value>, FlowError> {
            Ok(Some(Value::Seq(vec![Value::from("only")])))
        };
        let mut op = FlatMapOperator::new(
            OperatorConfig::named("upstream"),
            Box::new(expand),
            routes,
        )
        .unwrap();

        let err = op.receive(Packet::new("in")).unwrap_err();
        assert!(matches!(err, FlowError::TransformExecution { .. }));
        assert_eq!(ok_sink.lock().unwrap().len(), 1);
        assert_eq!(op.metrics().faults, 1);
    }

    /// Operator snapshots feed the in-memory aggregator.
    #[test]
    fn test_metrics_aggregation() {
        let (handle, _) = CaptureOperator::spawn("sink");
        let mut op = FlatMapOperator::new(
            OperatorConfig::named("expander"),
            Box::new(|v: Value| -> Result<Option<Value>, FlowError> {
                let n = v.as_int().unwrap_or(0);
                Ok(Some(Value::Seq(
                    (0..n).map(Value::Int).collect::<Vec<Value>>(),
                )))
            }),
            routed_to(handle),
        )
        .unwrap();

        let mut aggregator = FlowMetricsAggregator::new();
        for n in [3i64, 0, 5] {
            let before = op.metrics().items_emitted;
            op.receive(Packet::new(n)).unwrap();
            aggregator.record_packet(op.metrics().items_emitted - before);
        }

        let summary = aggregator.summary();
        assert_eq!(summary.total_packets, 3);
        assert_eq!(summary.total_items, 8);
        assert_eq!(summary.fanout.count, 3);
        assert!((summary.fanout.max - 5.0).abs() < 1e-10);
    }
}
