use proptest::prelude::*;

use crate::agreement::SharedSecret;
use crate::hash::{derive_message_hash, MessageHashDeriver, MESSAGE_HASH_LEN};

proptest! {
    #[test]
    fn test_derivation_determinism(
        secret in proptest::collection::vec(any::<u8>(), 1..48),
        message in any::<Vec<u8>>()
    ) {
        let s1 = SharedSecret::from(secret.clone());
        let s2 = SharedSecret::from(secret);
        let h1 = derive_message_hash(&s1, &message).unwrap();
        let h2 = derive_message_hash(&s2, &message).unwrap();
        prop_assert_eq!(h1.len(), MESSAGE_HASH_LEN);
        prop_assert_eq!(h1, h2);
    }

    #[test]
    fn test_distinct_messages_distinct_hashes(
        secret in proptest::collection::vec(any::<u8>(), 48),
        a in any::<Vec<u8>>(),
        b in any::<Vec<u8>>()
    ) {
        prop_assume!(a != b);
        let s = SharedSecret::from(secret);
        let deriver = MessageHashDeriver::default();
        prop_assert_ne!(deriver.derive(&s, &a).unwrap(), deriver.derive(&s, &b).unwrap());
    }

    #[test]
    fn test_output_len_respected(len in 1usize..512) {
        let s = SharedSecret::from(vec![7u8; 48]);
        let hash = MessageHashDeriver::with_output_len(len).derive(&s, b"msg").unwrap();
        prop_assert_eq!(hash.len(), len);
    }
}
