#[cfg(test)]
mod tests {
    use crate::chain::{BlockHeader, HeaderChain, InMemoryHeaderChain};
    use crate::error::ChainError;

    fn header(height: u32) -> BlockHeader {
        BlockHeader {
            hash: format!("h{height}"),
            height,
            version: 2,
            merkle_root: format!("m{height}"),
            time: 1_600_000_000 + height,
            bits: "1d00ffff".to_owned(),
            nonce: height,
            previous_block_hash: if height == 0 {
                None
            } else {
                Some(format!("h{}", height - 1))
            },
        }
    }

    fn headers(range: std::ops::Range<u32>) -> Vec<BlockHeader> {
        range.map(header).collect()
    }

    #[test]
    fn out_of_order_insertion_is_reconciled() {
        let mut chain = InMemoryHeaderChain::new();
        chain.add_headers(&headers(5..10)).unwrap();
        chain.add_headers(&headers(0..5)).unwrap();

        let longest = chain.longest_chain();
        assert_eq!(longest.len(), 10);
        assert_eq!(longest.first().unwrap().hash, "h0");
        assert_eq!(longest.last().unwrap().hash, "h9");
        for window in longest.windows(2) {
            assert_eq!(
                window[1].previous_block_hash.as_deref(),
                Some(window[0].hash.as_str())
            );
        }
    }

    #[test]
    fn longer_branch_wins() {
        let mut chain = InMemoryHeaderChain::new();
        chain.add_headers(&headers(0..4)).unwrap();

        // Fork off h1 with a branch that outgrows the original tip.
        let fork = vec![
            BlockHeader {
                hash: "f2".into(),
                previous_block_hash: Some("h1".into()),
                ..header(2)
            },
            BlockHeader {
                hash: "f3".into(),
                previous_block_hash: Some("f2".into()),
                ..header(3)
            },
            BlockHeader {
                hash: "f4".into(),
                previous_block_hash: Some("f3".into()),
                ..header(4)
            },
        ];
        chain.add_headers(&fork).unwrap();

        let longest = chain.longest_chain();
        assert_eq!(longest.len(), 5);
        assert_eq!(longest.last().unwrap().hash, "f4");
    }

    #[test]
    fn disconnected_branch_does_not_win() {
        let mut chain = InMemoryHeaderChain::new();
        chain.add_headers(&headers(0..4)).unwrap();
        // Headers 100..103 have no stored ancestors; connected depth is 3.
        chain.add_headers(&headers(100..103)).unwrap();

        let longest = chain.longest_chain();
        assert_eq!(longest.len(), 4);
        assert_eq!(longest.last().unwrap().hash, "h3");
    }

    #[test]
    fn conflicting_header_is_rejected_and_batch_not_applied() {
        let mut chain = InMemoryHeaderChain::new();
        chain.add_headers(&headers(0..2)).unwrap();

        let mut conflicting = header(1);
        conflicting.merkle_root = "different".into();
        let batch = vec![header(2), conflicting];

        let result = chain.add_headers(&batch);
        assert!(matches!(result, Err(ChainError::InvalidHeader { .. })));
        // Nothing from the failed batch was stored.
        assert!(chain.header("h2").is_none());
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn missing_parent_hash_is_invalid() {
        let mut chain = InMemoryHeaderChain::new();
        let mut orphan = header(5);
        orphan.previous_block_hash = None;
        let result = chain.add_headers(&[orphan]);
        assert!(matches!(result, Err(ChainError::InvalidHeader { .. })));
    }

    #[test]
    fn header_lookup_by_hash() {
        let mut chain = InMemoryHeaderChain::new();
        chain.add_headers(&headers(0..3)).unwrap();
        assert_eq!(chain.header("h1"), Some(&header(1)));
        assert!(chain.header("missing").is_none());
    }
}
