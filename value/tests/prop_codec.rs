use proptest::prelude::*;
use value::{decode_scalar, encode_prim, Prim, Scalar};

fn prim_strategy() -> impl Strategy<Value = Prim> {
    prop_oneof![
        Just(Prim::Null),
        any::<bool>().prop_map(Prim::Bool),
        any::<i64>().prop_map(Prim::Int),
        any::<f64>().prop_map(Prim::Float),
        any::<i128>().prop_map(Prim::BigInt),
        "[a-zA-Z0-9_@:.-]{0,24}".prop_map(Prim::Symbol),
        ".*".prop_map(Prim::Str),
    ]
}

fn prim_eq(a: &Prim, b: &Prim) -> bool {
    match (a, b) {
        (Prim::Float(x), Prim::Float(y)) => (x.is_nan() && y.is_nan()) || x == y,
        _ => a == b,
    }
}

proptest! {
    #[test]
    fn prop_prim_roundtrip(prim in prim_strategy()) {
        let encoded = encode_prim(&prim);
        let decoded = decode_scalar(&encoded).expect("encoded prims always decode");
        prop_assert!(prim_eq(&prim, &decoded), "{prim:?} decoded to {decoded:?}");
    }

    #[test]
    fn prop_encoded_floats_are_finite(prim in prim_strategy()) {
        if let Scalar::Float(f) = encode_prim(&prim) {
            prop_assert!(f.is_finite());
        }
    }

    #[test]
    fn prop_encoded_scalar_survives_json(prim in prim_strategy()) {
        let encoded = encode_prim(&prim);
        let text = serde_json::to_string(&encoded).unwrap();
        let back: Scalar = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(&back, &encoded);
    }

    #[test]
    fn prop_arbitrary_strings_pass_through(s in ".*") {
        let decoded = decode_scalar(&encode_prim(&Prim::Str(s.clone())))
            .expect("string encoding always decodes");
        prop_assert_eq!(decoded, Prim::Str(s));
    }
}
