#[cfg(test)]
mod formatting_tests {
    use std::collections::BTreeMap;

    use crate::{
        render, render_object, Describe, Node, Record, Render, RenderContext, ReprOptions,
        ReprRenderer, Value,
    };

    struct Ridge {
        alpha: f64,
        fit_intercept: bool,
    }

    impl Describe for Ridge {
        fn type_name(&self) -> &str {
            "Ridge"
        }

        fn params(&self) -> BTreeMap<String, Value> {
            BTreeMap::from([
                ("alpha".to_string(), Value::from(self.alpha)),
                ("fit_intercept".to_string(), Value::from(self.fit_intercept)),
            ])
        }
    }

    fn gradient_boosting() -> Record {
        Record::new("GradientBoosting")
            .with_param("learning_rate", 0.1)
            .with_param("n_estimators", 100)
            .with_param("max_depth", 3)
            .with_param("subsample", 1.0)
            .with_param("loss", "squared_error")
            .with_param("criterion", "friedman_mse")
            .with_param("min_samples_split", 2)
            .with_param("random_state", Value::None)
            .with_param("verbose", 0)
            .with_param("warm_start", false)
    }

    fn pipeline() -> Record {
        let scaler = Record::new("StandardScaler")
            .with_param("with_mean", true)
            .with_param("with_std", true);
        let ridge = Ridge {
            alpha: 1.0,
            fit_intercept: true,
        };
        let steps = Value::list(vec![
            Value::tuple(vec!["scale".into(), Value::object(scaler)]),
            Value::tuple(vec!["model".into(), Value::object(ridge)]),
        ]);
        Record::new("Pipeline")
            .with_param("steps", steps)
            .with_param("memory", Value::None)
            .with_param("verbose", false)
    }

    fn ints(range: std::ops::Range<i64>) -> Value {
        Value::list(range.map(Value::from).collect())
    }

    #[test]
    fn test_object_params_wrap_under_the_name() {
        let expected = concat!(
            "GradientBoosting(criterion='friedman_mse', learning_rate=0.1,\n",
            "                 loss='squared_error', max_depth=3, min_samples_split=2,\n",
            "                 n_estimators=100, random_state=None, subsample=1.0, verbose=0,\n",
            "                 warm_start=False)",
        );
        assert_eq!(gradient_boosting().repr(), expected);
    }

    #[test]
    fn test_nested_objects_fit_on_their_own_lines() {
        let expected = concat!(
            "Pipeline(memory=None,\n",
            "         steps=[('scale', StandardScaler(with_mean=True, with_std=True)),\n",
            "                ('model', Ridge(alpha=1.0, fit_intercept=True))],\n",
            "         verbose=False)",
        );
        assert_eq!(pipeline().repr(), expected);
    }

    #[test]
    fn test_narrow_width_breaks_nested_objects() {
        let expected = concat!(
            "Pipeline(memory=None,\n",
            "         steps=[('scale',\n",
            "                 StandardScaler(with_mean=True,\n",
            "                                with_std=True)),\n",
            "                ('model',\n",
            "                 Ridge(alpha=1.0,\n",
            "                       fit_intercept=True))],\n",
            "         verbose=False)",
        );
        assert_eq!(pipeline().repr_with(&ReprOptions::default().with_width(40)), expected);
    }

    #[test]
    fn test_trait_object_and_value_render_the_same() {
        let ridge = Ridge {
            alpha: 0.5,
            fit_intercept: false,
        };
        let borrowed = render_object(&ridge, &ReprOptions::default());
        let shared = render(&Value::object(ridge), &ReprOptions::default());
        assert_eq!(borrowed, "Ridge(alpha=0.5, fit_intercept=False)");
        assert_eq!(borrowed, shared);
    }

    #[test]
    fn test_long_list_stops_at_element_limit() {
        let expected = concat!(
            "[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21,\n",
            " 22, 23, 24, 25, 26, 27, 28, 29, ...]",
        );
        assert_eq!(render(&ints(0..40), &ReprOptions::default()), expected);
    }

    #[test]
    fn test_small_container_over_limit() {
        let dict = Value::dict([("c", 3), ("a", 1), ("b", 2)]);
        let options = ReprOptions::default().with_max_elements(2);
        assert_eq!(render(&dict, &options), "{'a': 1, 'b': 2, ...}");

        let list = ints(1..6);
        assert_eq!(render(&list, &options), "[1, 2, ...]");

        let tuple = Value::tuple(vec![1.into(), 2.into(), 3.into()]);
        assert_eq!(render(&tuple, &options), "(1, 2, ...)");
    }

    #[test]
    fn test_dict_entries_sorted_and_packed() {
        let expected = concat!(
            "{'key0': 0, 'key1': 1, 'key10': 10, 'key11': 11, 'key2': 2, 'key3': 3,\n",
            " 'key4': 4, 'key5': 5, 'key6': 6, 'key7': 7, 'key8': 8, 'key9': 9}",
        );
        let dict = Value::dict((0..12).rev().map(|i| (format!("key{}", i), i)));
        assert_eq!(render(&dict, &ReprOptions::default()), expected);
    }

    #[test]
    fn test_dict_order_ignores_insertion_order() {
        let forward = Value::dict([("x", 1), ("y", 2), ("z", 3)]);
        let backward = Value::dict([("z", 3), ("y", 2), ("x", 1)]);
        let options = ReprOptions::default();
        assert_eq!(render(&forward, &options), render(&backward, &options));
        assert_eq!(render(&forward, &options), render(&forward, &options));
    }

    #[test]
    fn test_mixed_keys_group_by_type() {
        let dict = Value::dict([
            (Value::from("b"), Value::from(1)),
            (Value::from("a"), Value::from(2)),
            (Value::from(10), Value::from("x")),
            (Value::from(2), Value::from("y")),
        ]);
        assert_eq!(
            render(&dict, &ReprOptions::default()),
            "{2: 'y', 10: 'x', 'a': 2, 'b': 1}"
        );
    }

    #[test]
    fn test_equal_keys_share_one_entry() {
        let pairs = Value::dict([(Value::tuple(vec![1.into(), 2.into()]), "first")]);
        pairs.insert(Value::tuple(vec![1.into(), 2.into()]), "second");
        assert_eq!(pairs.len(), Some(1));
        assert_eq!(render(&pairs, &ReprOptions::default()), "{(1, 2): 'second'}");

        // The first key inserted is kept, the last value wins
        let numbers = Value::dict([(Value::from(true), "bool")]);
        numbers.insert(1.0, "float");
        numbers.insert(1, "int");
        assert_eq!(numbers.len(), Some(1));
        assert_eq!(render(&numbers, &ReprOptions::default()), "{True: 'int'}");

        let distinct = Value::dict([(Value::from(2), "int")]);
        distinct.insert(2.5, "float");
        distinct.insert(Value::tuple(vec![2.into()]), "tuple");
        assert_eq!(distinct.len(), Some(3));
    }

    #[test]
    fn test_nan_key_order_ignores_insertion_order() {
        let keys = [Value::from(1), Value::from(100.0), Value::from(f64::NAN)];
        let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        for order in orders {
            let dict = Value::dict(order.iter().map(|&i| (keys[i].clone(), Value::None)));
            assert_eq!(
                render(&dict, &ReprOptions::default()),
                "{1: None, 100.0: None, nan: None}",
                "insertion order {:?}",
                order
            );
        }
    }

    #[test]
    fn test_tuple_forms() {
        let options = ReprOptions::default();
        assert_eq!(render(&Value::tuple(vec![5.into()]), &options), "(5,)");
        assert_eq!(render(&Value::tuple(vec![]), &options), "()");
        let nested = Value::tuple(vec![
            Value::tuple(vec![1.into()]),
            Value::tuple(vec![2.into(), 3.into()]),
        ]);
        assert_eq!(render(&nested, &options), "((1,), (2, 3))");
        assert_eq!(render(&Value::list(vec![]), &options), "[]");
        assert_eq!(render(&Value::dict(Vec::<(Value, Value)>::new()), &options), "{}");
    }

    #[test]
    fn test_wide_tuple_reserves_room_for_closing_paren() {
        let items = (0..12).map(|i| Value::from(format!("item{:02}", i))).collect();
        let expected = concat!(
            "('item00', 'item01', 'item02', 'item03',\n",
            " 'item04', 'item05', 'item06', 'item07',\n",
            " 'item08', 'item09', 'item10',\n",
            " 'item11')",
        );
        let options = ReprOptions::default().with_width(40);
        assert_eq!(render(&Value::tuple(items), &options), expected);
    }

    #[test]
    fn test_compact_packing_versus_one_per_line() {
        let list = ints(1..7);
        let compact = ReprOptions::default().with_width(12);
        assert_eq!(render(&list, &compact), "[1, 2, 3, 4,\n 5, 6]");

        let spread = compact.with_compact(false);
        assert_eq!(render(&list, &spread), "[1,\n 2,\n 3,\n 4,\n 5,\n 6]");
    }

    #[test]
    fn test_nested_lists_break_per_row() {
        let matrix = Value::list(vec![ints(1..4), ints(4..7), ints(7..10)]);
        let options = ReprOptions::default().with_width(12);
        assert_eq!(render(&matrix, &options), "[[1, 2, 3],\n [4, 5, 6],\n [7, 8, 9]]");
    }

    #[test]
    fn test_value_wraps_after_its_key() {
        let model = Record::new("Model")
            .with_param("coef", Value::list(vec![0.5.into(), 0.5.into(), 0.5.into()]))
            .with_param("name_", "lasso");
        let expected = concat!(
            "Model(coef=[0.5, 0.5,\n",
            "            0.5],\n",
            "      name_='lasso')",
        );
        assert_eq!(model.repr_with(&ReprOptions::default().with_width(24)), expected);
    }

    #[test]
    fn test_scalar_literals_inside_objects() {
        let config = Record::new("Config")
            .with_param("flag", true)
            .with_param("huge", 1e20)
            .with_param("label", "it's")
            .with_param("nothing", Value::None)
            .with_param("path", "C:\\tmp")
            .with_param("ratio", 1e-7);
        let expected = concat!(
            "Config(flag=True, huge=1e+20, label=\"it's\",\n",
            "       nothing=None, path='C:\\\\tmp', ratio=1e-07)",
        );
        assert_eq!(config.repr_with(&ReprOptions::default().with_width(50)), expected);
    }

    const TITLE: &str =
        "Historical daily closing prices for all listed symbols between the first and last trading day";

    #[test]
    fn test_long_string_parameter_splits_at_words() {
        let report = Record::new("Report").with_param("title", TITLE).with_param("year", 2020);
        let expected = concat!(
            "Report(title='Historical daily closing prices for all listed symbols between '\n",
            "             'the first and last trading day',\n",
            "       year=2020)",
        );
        assert_eq!(report.repr(), expected);

        let narrow = Record::new("Report").with_param("title", TITLE);
        let expected = concat!(
            "Report(title='Historical daily closing '\n",
            "             'prices for all listed '\n",
            "             'symbols between the '\n",
            "             'first and last trading '\n",
            "             'day')",
        );
        assert_eq!(narrow.repr_with(&ReprOptions::default().with_width(40)), expected);
    }

    #[test]
    fn test_top_level_long_string_is_parenthesized() {
        let expected = concat!(
            "('Historical daily closing prices for all listed symbols between the first and '\n",
            " 'last trading day')",
        );
        assert_eq!(render(&Value::from(TITLE), &ReprOptions::default()), expected);

        // A single unbreakable word stays as one literal
        let word = "x".repeat(100);
        let options = ReprOptions::default().with_width(40);
        assert_eq!(render(&Value::from(word.as_str()), &options), format!("'{}'", word));
    }

    #[test]
    fn test_string_pieces_follow_line_breaks() {
        let lines = Value::list(vec!["line one\nline two\nline three".into()]);
        let options = ReprOptions::default().with_width(20);
        assert_eq!(
            render(&lines, &options),
            "['line one\\n'\n 'line two\\n'\n 'line three']"
        );

        let note = Value::dict([("note", "alpha beta gamma delta epsilon zeta eta theta")]);
        let options = ReprOptions::default().with_width(30);
        let expected = concat!(
            "{'note': 'alpha beta gamma '\n",
            "         'delta epsilon zeta '\n",
            "         'eta theta'}",
        );
        assert_eq!(render(&note, &options), expected);
    }

    #[test]
    fn test_empty_object() {
        assert_eq!(Record::new("Empty").repr(), "Empty()");
    }

    #[test]
    fn test_depth_limit_collapses_containers() {
        let dict = Value::dict([(
            "a",
            Value::dict([("b", Value::dict([("c", ints(1..3))]))]),
        )]);
        let options = ReprOptions::default().with_max_depth(2);
        assert_eq!(render(&dict, &options), "{'a': {'b': {...}}}");

        let singleton = Value::list(vec![Value::tuple(vec![1.into()])]);
        let shallow = ReprOptions::default().with_max_depth(1);
        assert_eq!(render(&singleton, &shallow), "[(...,)]");

        // Zero means unlimited
        let unlimited = ReprOptions::default().with_max_depth(0);
        assert_eq!(render(&dict, &unlimited), "{'a': {'b': {'c': [1, 2]}}}");
    }

    #[test]
    fn test_depth_limit_on_wrapped_entry() {
        let dict = Value::dict([(
            "alpha",
            Value::dict([
                ("beta", Value::dict([("gamma", ints(1..3))])),
                ("delta", ints(0..10)),
            ]),
        )]);
        let options = ReprOptions::default().with_max_depth(2).with_width(20);
        assert_eq!(render(&dict, &options), "{'alpha': {...}}");
    }

    #[test]
    fn test_depth_limit_on_nested_object() {
        let outer = Record::new("Outer")
            .with_param("inner", Value::object(Record::new("Inner").with_param("x", ints(1..4))))
            .with_param("n", 5);
        let options = ReprOptions::default().with_max_depth(1);
        assert_eq!(outer.repr_with(&options), "Outer(inner={...}, n=5)");
    }

    #[test]
    fn test_self_referential_dict() {
        let dict = Value::dict([("a", 1)]);
        dict.insert("self", dict.clone());

        assert_eq!(
            render(&dict, &ReprOptions::default()),
            "{'a': 1, 'self': <Recursion on dict>}"
        );
    }

    #[test]
    fn test_self_referential_dict_when_wrapped() {
        let dict = Value::dict([("alpha", 1)]);
        dict.insert("loop", dict.clone());
        dict.insert("zeta", ints(0..5));

        let expected = concat!(
            "{'alpha': 1,\n",
            " 'loop': <Recursion on dict>,\n",
            " 'zeta': [0, 1, 2,\n",
            "          3, 4]}",
        );
        let options = ReprOptions::default().with_width(20);
        assert_eq!(render(&dict, &options), expected);
    }

    #[test]
    fn test_self_referential_list() {
        let list = ints(1..3);
        list.push(list.clone());
        assert_eq!(render(&list, &ReprOptions::default()), "[1, 2, <Recursion on list>]");
    }

    #[test]
    fn test_mutual_recursion_terminates() {
        let a = Value::list(vec![]);
        let b = Value::list(vec![a.clone()]);
        a.push(b.clone());
        assert_eq!(render(&a, &ReprOptions::default()), "[[<Recursion on list>]]");
    }

    #[test]
    fn test_shared_but_acyclic_values_render_twice() {
        let shared = ints(1..3);
        let outer = Value::list(vec![shared.clone(), shared]);
        assert_eq!(render(&outer, &ReprOptions::default()), "[[1, 2], [1, 2]]");
    }

    #[test]
    fn test_readability_flags() {
        let renderer = ReprRenderer::default();

        let plain = Value::dict([("a", ints(1..3))]);
        let rendered = renderer.render_node(Node::from(&plain));
        assert!(rendered.readable);
        assert!(!rendered.recursive);

        let cyclic = Value::list(vec![]);
        cyclic.push(cyclic.clone());
        let rendered = renderer.render_node(Node::from(&cyclic));
        assert!(!rendered.readable);
        assert!(rendered.recursive);

        let shallow = ReprRenderer::new(ReprOptions::default().with_max_depth(1));
        let rendered = shallow.render_node(Node::from(&plain));
        assert_eq!(rendered.text, "{'a': [...]}");
        assert!(!rendered.readable);
        assert!(!rendered.recursive);

        let opaque = Value::list(vec![Value::opaque("<function f>")]);
        let rendered = renderer.render_node(Node::from(&opaque));
        assert_eq!(rendered.text, "[<function f>]");
        assert!(!rendered.readable);

        let literal_like = Value::opaque("Decimal('1.5')");
        assert!(renderer.render_node(Node::from(&literal_like)).readable);
    }

    #[test]
    fn test_context_is_balanced_after_render() {
        let dict = Value::dict([("a", ints(1..4))]);
        dict.insert("self", dict.clone());

        let mut context = RenderContext::new();
        let repr = dict.render(&mut context, 0);
        assert!(repr.recursive);
        assert_eq!(context.active_count(), 0);
    }

    #[test]
    fn test_entered_guard_unregisters_on_drop() {
        let mut context = RenderContext::new();
        {
            let mut entered = context.enter(7).expect("first entry");
            assert!(entered.is_active(7));
            assert!(entered.enter(7).is_none());
        }
        assert!(!context.is_active(7));
        assert_eq!(context.active_count(), 0);
    }

    #[test]
    fn test_character_budget_cuts_long_output() {
        let big = Record::new("Big").with_param("values", ints(0..300));
        let expected = concat!(
            "Big(values=[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18,\n",
            "            19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35,\n",
            "            36, 37, 38, 39, 40, 41, 42, 43, 44, 45, 46, 47, 48, 49, 50, 51, 52,\n",
            "            53, 54, 55, 56, 57, 58, 59, 60, 61, 62, 63, 64, 65, 66, 67, 68, 69,\n",
            "            70, 71, 72, 73, 74, 75, 76, 77, 78, 79, 80, 81, 82, 83, 84, 85, 86,\n",
            "            87, 88, 89, 90, 91, 92, 93, 94, 95, 96, 97, 98, 99, 100, 101, 102,\n",
            "            103, 104, 105, 106, 107, 108, 109, 110, 111,...\n",
            "            207, 208, 209, 210, 211, 212, 213, 214, 215, 216, 217, 218, 219,\n",
            "            220, 221, 222, 223, 224, 225, 226, 227, 228, 229, 230, 231, 232,\n",
            "            233, 234, 235, 236, 237, 238, 239, 240, 241, 242, 243, 244, 245,\n",
            "            246, 247, 248, 249, 250, 251, 252, 253, 254, 255, 256, 257, 258,\n",
            "            259, 260, 261, 262, 263, 264, 265, 266, 267, 268, 269, 270, 271,\n",
            "            272, 273, 274, 275, 276, 277, 278, 279, 280, 281, 282, 283, 284,\n",
            "            285, 286, 287, 288, 289, 290, 291, 292, 293, 294, 295, 296, 297,\n",
            "            298, 299])",
        );
        let options = ReprOptions::default().with_max_elements(None);
        assert_eq!(big.repr_with(&options), expected);

        // Without a budget nothing is cut
        let uncut = big.repr_with(&options.clone().with_max_chars(None));
        assert!(!uncut.contains("..."));
        assert!(uncut.contains(", 150, "));
    }

    #[test]
    fn test_display_and_debug() {
        let list = ints(1..4);
        assert_eq!(format!("{}", list), "[1, 2, 3]");
        assert_eq!(format!("{:?}", list), "[1, 2, 3]");

        // Debug ignores the element limit
        let long = ints(0..40);
        assert!(!format!("{:?}", long).contains("..."));
    }
}
