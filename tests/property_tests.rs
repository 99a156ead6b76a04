//! Property-based tests for rust_named_logger using proptest

use proptest::prelude::*;
use rust_named_logger::appenders::MemoryAppender;
use rust_named_logger::prelude::*;
use std::sync::Arc;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Error),
        Just(LogLevel::Info),
        Just(LogLevel::Debug),
        Just(LogLevel::Default),
    ]
}

fn gating_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Error),
        Just(LogLevel::Info),
        Just(LogLevel::Debug),
    ]
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Test that LogLevel string conversions roundtrip correctly
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Test that parsing accepts case-insensitive input
    #[test]
    fn test_log_level_case_insensitive(level in any_level(), use_lower in any::<bool>()) {
        let input = if use_lower {
            level.to_str().to_lowercase()
        } else {
            level.to_str().to_string()
        };
        prop_assert_eq!(input.parse::<LogLevel>(), Ok(level));
    }

    /// A message passes exactly when it is a real level no more verbose than
    /// the threshold
    #[test]
    fn test_passes_matches_ordering(message in any_level(), threshold in any_level()) {
        let expected = message != LogLevel::Default && (message as u8) <= (threshold as u8);
        prop_assert_eq!(message.passes(threshold), expected);
    }
}

// ============================================================================
// Registry / Handle Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A handle emits exactly the records at or below its effective level
    #[test]
    fn test_handle_filtering(
        node_level in gating_level(),
        override_level in any_level(),
        calls in prop::collection::vec(any_level(), 0..20),
    ) {
        let memory = Arc::new(MemoryAppender::new());
        let registry = Registry::builder().shared_appender(memory.clone()).build();
        registry.node("a/b").set_level(node_level);
        let logger = registry.named("a/b").with_level(override_level);

        let effective = if override_level == LogLevel::Default { node_level } else { override_level };
        prop_assert_eq!(logger.effective_level(), effective);

        for level in &calls {
            logger.log(*level, "m");
        }
        let expected = calls.iter().filter(|level| level.passes(effective)).count();
        prop_assert_eq!(memory.len(), expected);
    }

    /// Setting a level on a path reaches every existing descendant and nothing
    /// outside the subtree
    #[test]
    fn test_set_level_reaches_subtree(
        paths in prop::collection::vec("[a-c](/[a-c]){0,3}", 1..12),
        level in gating_level(),
    ) {
        let registry = Registry::new();
        for path in &paths {
            registry.node(path);
        }
        registry.node("a").set_level(level);

        for node in registry.tree().iter() {
            let inside = node.path == "a" || node.path.starts_with("a/");
            if inside {
                prop_assert_eq!(node.level, level);
            } else {
                prop_assert_eq!(node.level, LogLevel::Error);
            }
        }
    }

    /// Empty segments never create nodes
    #[test]
    fn test_path_normalisation(segments in prop::collection::vec("[a-z]{1,4}", 1..5)) {
        let registry = Registry::new();
        let plain = segments.join("/");
        let noisy = format!("/{}//", segments.join("//"));
        prop_assert!(Arc::ptr_eq(&registry.node(&plain), &registry.node(&noisy)));
        prop_assert_eq!(registry.node(&noisy).path(), plain);
    }
}

// ============================================================================
// Caller Rendering Tests
// ============================================================================

proptest! {
    /// Width keeps the tail of long strings (or the head when left-aligned)
    /// and left-pads short ones
    #[test]
    fn test_caller_width(
        file in "[a-z_]{1,30}\\.rs",
        line in 1u32..100_000,
        width in 1usize..40,
    ) {
        let caller = Caller::new(file, line, "");
        let full = format!("{:.5}", caller);
        let len = full.chars().count();

        let right = format!("{:width$.5}", caller, width = width);
        let left = format!("{:<width$.5}", caller, width = width);
        prop_assert_eq!(right.chars().count(), width.max(len));

        if width <= len {
            prop_assert_eq!(&right, &full[len - width..]);
            prop_assert_eq!(&left, &full[..width]);
        } else {
            prop_assert!(right.ends_with(&full));
            prop_assert!(right.starts_with(' '));
            prop_assert_eq!(&left, &right);
        }
    }

    /// Embedded line breaks never split a record
    #[test]
    fn test_message_stays_on_one_line(message in ".*") {
        let logger = Registry::new().named("p");
        let entry = LogEntry::new(LogLevel::Error, message, &logger, Caller::unknown());
        prop_assert!(!entry.message.contains('\n'));
        prop_assert!(!entry.message.contains('\r'));
    }
}
