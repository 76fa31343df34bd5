//! Unit tests for affix-core primitives.

#[cfg(test)]
mod breakpoint {
    use crate::{BreakpointOrder, BreakpointQuery, Modifier, DEFAULT_BREAKPOINTS};

    #[test]
    fn default_order_is_six_tiers() {
        let order = BreakpointOrder::default();
        assert_eq!(order.names().len(), DEFAULT_BREAKPOINTS.len());
        assert_eq!(order.index_of("xs"), Some(0));
        assert_eq!(order.index_of("xxl"), Some(5));
    }

    #[test]
    fn empty_order_rejected() {
        assert!(BreakpointOrder::new(Vec::<String>::new()).is_err());
    }

    #[test]
    fn query_parse_modifiers() {
        assert_eq!(
            BreakpointQuery::parse("md+"),
            BreakpointQuery { name: "md".into(), modifier: Some(Modifier::OrLarger) }
        );
        assert_eq!(
            BreakpointQuery::parse("lg-"),
            BreakpointQuery { name: "lg".into(), modifier: Some(Modifier::OrSmaller) }
        );
        assert_eq!(
            BreakpointQuery::parse("sm"),
            BreakpointQuery { name: "sm".into(), modifier: None }
        );
    }

    #[test]
    fn exact_match() {
        let order = BreakpointOrder::default();
        assert!(order.satisfies("md", "md"));
        assert!(!order.satisfies("md", "sm"));
        assert!(!order.satisfies("md", "lg"));
    }

    #[test]
    fn or_larger() {
        let order = BreakpointOrder::default();
        assert!(order.satisfies("md+", "md"));
        assert!(order.satisfies("md+", "xxl"));
        assert!(!order.satisfies("md+", "sm"));
    }

    #[test]
    fn or_smaller() {
        let order = BreakpointOrder::default();
        assert!(order.satisfies("md-", "md"));
        assert!(order.satisfies("md-", "xs"));
        assert!(!order.satisfies("md-", "lg"));
    }

    #[test]
    fn unknown_query_name_is_false() {
        let order = BreakpointOrder::default();
        assert!(!order.satisfies("enormous", "md"));
        assert!(!order.satisfies("enormous+", "md"));
        assert!(!order.satisfies("", "md"));
    }

    #[test]
    fn unknown_current_tier_is_false() {
        let order = BreakpointOrder::default();
        assert!(!order.satisfies("md+", "widescreen"));
        assert!(!order.satisfies("md-", "widescreen"));
    }

    #[test]
    fn custom_order() {
        let order = BreakpointOrder::new(["small", "large"]).unwrap();
        assert!(order.satisfies("small+", "large"));
        assert!(!order.satisfies("md", "small"));
    }
}

#[cfg(test)]
mod oracle {
    use crate::{BreakpointOracle, FixedOracle};

    #[test]
    fn fixed_oracle_set_get() {
        let oracle = FixedOracle::new("sm");
        assert_eq!(oracle.current(), "sm");
        oracle.set("xl");
        assert_eq!(oracle.current(), "xl");
    }

    #[test]
    fn shared_handle_observes_set() {
        use std::rc::Rc;
        let oracle = Rc::new(FixedOracle::new("xs"));
        let handle = Rc::clone(&oracle);
        handle.set("lg");
        assert_eq!(oracle.current(), "lg");
    }
}

#[cfg(test)]
mod token {
    use crate::CancellationToken;

    #[test]
    fn clones_share_the_flag() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn cancel_is_idempotent() {
        let token = CancellationToken::new();
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn same_token_identity() {
        let a = CancellationToken::new();
        let b = a.clone();
        let c = CancellationToken::new();
        assert!(a.same_token(&b));
        assert!(!a.same_token(&c));
    }
}

#[cfg(test)]
mod time {
    use crate::Millis;

    #[test]
    fn arithmetic() {
        let t = Millis(100);
        assert_eq!(t + 50, Millis(150));
        assert_eq!(t.offset(25), Millis(125));
        assert_eq!(Millis(150).since(Millis(100)), 50);
        assert_eq!(Millis(100).since(Millis(150)), 0, "since saturates");
    }

    #[test]
    fn display() {
        assert_eq!(Millis(250).to_string(), "250ms");
    }
}
