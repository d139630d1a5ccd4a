//! Tests for the inference core
//!
//! Covers the feature schema, model formats, class mapping, artifact loading and the
//! predictor, using the bundled artifacts where a real model is needed.

#[cfg(test)]
mod tests {
    use crate::artifacts::{ArtifactPaths, Artifacts, CLASS_MAP_FILE, MODEL_FILE};
    use crate::classifier::{Classifier, argmax};
    use crate::error::{ArtifactError, FormError, PredictError};
    use crate::features::{FEATURES, FeatureKind, FeatureRecord, feature_names};
    use crate::forest::{DecisionTree, RandomForest, TreeNode};
    use crate::linear::LogisticRegression;
    use crate::mapping::ClassMapping;
    use crate::ml::{MLModel, ModelWithMeta};
    use crate::prediction::{format_confidence, max_probability, predict};
    use fauna_types::json::{self, json};
    use std::sync::Arc;

    const MODEL_JSON: &[u8] = include_bytes!("../../../artifacts/animal_classifier.json");
    const CLASS_MAP_CSV: &[u8] = include_bytes!("../../../artifacts/class_mapping.csv");

    fn bundled_artifacts() -> Artifacts {
        let model = MLModel::from_json_slice(MODEL_JSON).unwrap();
        let class_map = ClassMapping::from_csv_reader(CLASS_MAP_CSV).unwrap();
        let description = model.to_string();
        Artifacts::new(Arc::new(model), class_map, description)
    }

    fn mammal() -> FeatureRecord {
        FeatureRecord {
            hair: 1,
            feathers: 0,
            eggs: 0,
            milk: 1,
            airborne: 0,
            aquatic: 0,
            predator: 1,
            toothed: 1,
            backbone: 1,
            breathes: 1,
            venomous: 0,
            fins: 0,
            legs: 4,
            tail: 1,
            domestic: 0,
            catsize: 1,
        }
    }

    fn names() -> Vec<String> {
        feature_names().map(str::to_string).collect()
    }

    fn leaf(value: &[f64]) -> TreeNode {
        TreeNode::Leaf {
            value: value.to_vec(),
        }
    }

    // ============================================================================
    // Feature schema
    // ============================================================================

    #[test]
    fn test_schema_has_sixteen_features_in_order() {
        let names: Vec<&str> = feature_names().collect();
        assert_eq!(
            names,
            vec![
                "hair", "feathers", "eggs", "milk", "airborne", "aquatic", "predator", "toothed",
                "backbone", "breathes", "venomous", "fins", "legs", "tail", "domestic", "catsize"
            ]
        );
        assert_eq!(FEATURES[15].label, "Cat Size");
    }

    #[test]
    fn test_binary_features_only_offer_zero_and_one() {
        let binary: Vec<_> = FEATURES
            .iter()
            .filter(|f| f.kind == FeatureKind::Binary)
            .collect();
        assert_eq!(binary.len(), 15);
        for spec in binary {
            assert_eq!(spec.kind.options(), vec![0, 1], "{}", spec.name);
            assert!(!spec.kind.contains(2));
        }
    }

    #[test]
    fn test_legs_range_and_default() {
        let legs = FEATURES.iter().find(|f| f.name == "legs").unwrap();
        assert_eq!(
            legs.kind,
            FeatureKind::Range {
                min: 0,
                max: 8,
                default: 2
            }
        );
        assert_eq!(legs.kind.options(), (0..=8).collect::<Vec<u8>>());
        assert!(!legs.kind.contains(9));
        assert_eq!(FeatureRecord::default().legs, 2);
    }

    #[test]
    fn test_record_set_and_get() {
        let mut record = FeatureRecord::default();
        record.set("legs", 6).unwrap();
        record.set("catsize", 1).unwrap();
        assert_eq!(record.get("legs"), Some(6));
        assert_eq!(record.get("catsize"), Some(1));
        assert_eq!(record.get("wings"), None);
    }

    #[test]
    fn test_record_set_rejects_out_of_domain() {
        let mut record = FeatureRecord::default();
        assert_eq!(
            record.set("hair", 2),
            Err(FormError::OutOfRange {
                field: "hair",
                value: "2".to_string()
            })
        );
        assert!(record.set("legs", 9).is_err());
        assert_eq!(
            record.set("wings", 1),
            Err(FormError::UnknownField("wings".to_string()))
        );
        assert_eq!(record, FeatureRecord::default());
    }

    #[test]
    fn test_record_validate() {
        assert!(mammal().validate().is_ok());
        let record = FeatureRecord {
            venomous: 3,
            ..FeatureRecord::default()
        };
        assert!(matches!(
            record.validate(),
            Err(FormError::OutOfRange {
                field: "venomous",
                ..
            })
        ));
    }

    #[test]
    fn test_record_to_vector_column_order() {
        let v = mammal().to_vector();
        assert_eq!(v.len(), 16);
        assert_eq!(v[0], 1.0); // hair
        assert_eq!(v[1], 0.0); // feathers
        assert_eq!(v[12], 4.0); // legs
        assert_eq!(v[15], 1.0); // catsize
    }

    #[test]
    fn test_record_json_requires_exact_keys() {
        let full = json::to_value(mammal()).unwrap();
        let parsed: FeatureRecord = json::from_value(full.clone()).unwrap();
        assert_eq!(parsed, mammal());

        let mut missing = full.clone();
        missing.as_object_mut().unwrap().remove("legs");
        assert!(json::from_value::<FeatureRecord>(missing).is_err());

        let mut extra = full;
        extra
            .as_object_mut()
            .unwrap()
            .insert("wings".to_string(), json!(1));
        assert!(json::from_value::<FeatureRecord>(extra).is_err());
    }

    // ============================================================================
    // Model formats
    // ============================================================================

    #[test]
    fn test_argmax_first_on_ties() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_tree_rejects_backward_child() {
        let tree = DecisionTree {
            nodes: vec![
                leaf(&[1.0, 0.0]),
                TreeNode::Split {
                    feature: 0,
                    threshold: 0.5,
                    left: 0,
                    right: 2,
                },
                leaf(&[0.0, 1.0]),
            ],
        };
        let err = tree.validate(16, 2).unwrap_err();
        assert!(err.to_string().contains("child index 0"));
    }

    #[test]
    fn test_tree_rejects_wrong_leaf_width() {
        let tree = DecisionTree {
            nodes: vec![leaf(&[1.0, 0.0, 0.0])],
        };
        assert!(tree.validate(16, 2).is_err());
    }

    #[test]
    fn test_tree_rejects_leaf_weights_that_overflow() {
        let tree = DecisionTree {
            nodes: vec![leaf(&[1e308, 1e308])],
        };
        let err = tree.validate(16, 2).unwrap_err();
        assert!(err.to_string().contains("overflow"));

        let forest = RandomForest {
            trees: vec![DecisionTree {
                nodes: vec![leaf(&[1e307, 3e307])],
            }],
        };
        forest.validate(16, 2).unwrap();
        let proba = forest
            .predict_proba(FeatureRecord::default().to_vector().view())
            .unwrap();
        assert!((proba.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tree_rejects_feature_out_of_range() {
        let tree = DecisionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: 16,
                    threshold: 0.5,
                    left: 1,
                    right: 2,
                },
                leaf(&[1.0, 0.0]),
                leaf(&[0.0, 1.0]),
            ],
        };
        assert!(tree.validate(16, 2).is_err());
    }

    #[test]
    fn test_forest_averages_normalised_leaves() {
        let split_on_hair = DecisionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: 0,
                    threshold: 0.5,
                    left: 1,
                    right: 2,
                },
                leaf(&[0.0, 4.0]),
                leaf(&[3.0, 1.0]),
            ],
        };
        let constant = DecisionTree {
            nodes: vec![leaf(&[1.0, 1.0])],
        };
        let forest = RandomForest {
            trees: vec![split_on_hair, constant],
        };
        forest.validate(16, 2).unwrap();

        let proba = forest.predict_proba(mammal().to_vector().view()).unwrap();
        assert!((proba[0] - 0.625).abs() < 1e-12);
        assert!((proba[1] - 0.375).abs() < 1e-12);
    }

    #[test]
    fn test_logistic_softmax_sums_to_one() {
        let mut coefficients = vec![vec![0.0; 16]; 3];
        coefficients[0][0] = 2.0; // hair
        coefficients[1][1] = 2.0; // feathers
        let model = LogisticRegression {
            coefficients,
            intercepts: vec![0.0, 0.0, -1.0],
        };
        model.validate(16, 3).unwrap();

        let proba = model.predict_proba(mammal().to_vector().view()).unwrap();
        assert!((proba.sum() - 1.0).abs() < 1e-12);
        assert!(proba[0] > proba[1] && proba[1] > proba[2]);
    }

    #[test]
    fn test_logistic_binary_uses_sigmoid() {
        let model = LogisticRegression {
            coefficients: vec![vec![0.0; 16]],
            intercepts: vec![0.0],
        };
        model.validate(16, 2).unwrap();
        let proba = model
            .predict_proba(FeatureRecord::default().to_vector().view())
            .unwrap();
        assert_eq!(proba.to_vec(), vec![0.5, 0.5]);
    }

    #[test]
    fn test_logistic_rejects_bad_shapes() {
        let model = LogisticRegression {
            coefficients: vec![vec![0.0; 15]; 3],
            intercepts: vec![0.0; 3],
        };
        assert!(model.validate(16, 3).is_err());

        let model = LogisticRegression {
            coefficients: vec![vec![0.0; 16]; 3],
            intercepts: vec![0.0; 2],
        };
        assert!(model.validate(16, 3).is_err());
    }

    #[test]
    fn test_logistic_rejects_single_class() {
        let model = LogisticRegression {
            coefficients: vec![vec![0.0; 16]],
            intercepts: vec![1.0],
        };
        let err = model.validate(16, 1).unwrap_err();
        assert!(err.to_string().contains("at least two classes"));

        let wrapped = MLModel::LogisticRegression(ModelWithMeta {
            model,
            classes: vec![1],
            feature_names: names(),
        });
        let bytes = wrapped.to_json_vec().unwrap();
        assert!(MLModel::from_json_slice(&bytes).is_err());
    }

    #[test]
    fn test_model_json_tagged_by_type() {
        let model = MLModel::LogisticRegression(ModelWithMeta {
            model: LogisticRegression {
                coefficients: vec![vec![0.5; 16]],
                intercepts: vec![-4.0],
            },
            classes: vec![3, 9],
            feature_names: names(),
        });
        let bytes = model.to_json_vec().unwrap();
        let value: fauna_types::Value = json::from_slice(&bytes).unwrap();
        assert_eq!(value["type"], json!("LogisticRegression"));

        let parsed = MLModel::from_json_slice(&bytes).unwrap();
        assert_eq!(parsed, model);
        assert_eq!(parsed.classes(), &[3, 9]);
    }

    #[test]
    fn test_model_rejects_wrong_feature_columns() {
        let mut feature_names = names();
        feature_names.swap(0, 1);
        let model = MLModel::RandomForest(ModelWithMeta {
            model: RandomForest {
                trees: vec![DecisionTree {
                    nodes: vec![leaf(&[1.0])],
                }],
            },
            classes: vec![1],
            feature_names,
        });
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_model_rejects_duplicate_classes() {
        let model = MLModel::RandomForest(ModelWithMeta {
            model: RandomForest {
                trees: vec![DecisionTree {
                    nodes: vec![leaf(&[1.0, 1.0])],
                }],
            },
            classes: vec![1, 1],
            feature_names: names(),
        });
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_bundled_model_loads() {
        let model = MLModel::from_json_slice(MODEL_JSON).unwrap();
        assert_eq!(model.classes(), &[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(model.to_string(), "Random Forest Classification (2 trees)");
    }

    // ============================================================================
    // Class mapping
    // ============================================================================

    #[test]
    fn test_mapping_reads_required_columns() {
        let map = ClassMapping::from_csv_reader(CLASS_MAP_CSV).unwrap();
        assert_eq!(map.len(), 7);
        assert_eq!(map.label(1).unwrap(), "Mammal");
        assert_eq!(map.label(7).unwrap(), "Invertebrate");
    }

    #[test]
    fn test_mapping_unknown_class() {
        let map = ClassMapping::from_csv_reader(CLASS_MAP_CSV).unwrap();
        assert!(matches!(map.label(8), Err(PredictError::UnknownClass(8))));
    }

    #[test]
    fn test_mapping_duplicates() {
        let same = "Class_Number,Class_Type\n1,Mammal\n1,Mammal\n";
        assert_eq!(
            ClassMapping::from_csv_reader(same.as_bytes()).unwrap().len(),
            1
        );

        let conflicting = "Class_Number,Class_Type\n1,Mammal\n1,Bird\n";
        assert!(ClassMapping::from_csv_reader(conflicting.as_bytes()).is_err());
    }

    #[test]
    fn test_mapping_missing_column() {
        let csv = "Class_Number,Name\n1,Mammal\n";
        assert!(ClassMapping::from_csv_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_mapping_empty() {
        let csv = "Class_Number,Class_Type\n";
        assert!(ClassMapping::from_csv_reader(csv.as_bytes()).is_err());
    }

    // ============================================================================
    // Artifact loading
    // ============================================================================

    fn write_bundled(dir: &std::path::Path) {
        std::fs::write(dir.join(MODEL_FILE), MODEL_JSON).unwrap();
        std::fs::write(dir.join(CLASS_MAP_FILE), CLASS_MAP_CSV).unwrap();
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        write_bundled(dir.path());

        let artifacts = Artifacts::load(&ArtifactPaths::in_dir(dir.path())).unwrap();
        assert_eq!(artifacts.class_map().len(), 7);
        assert_eq!(artifacts.classifier().classes().len(), 7);
        assert!(artifacts.description().starts_with("Random Forest"));
    }

    #[test]
    fn test_load_missing_model_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CLASS_MAP_FILE), CLASS_MAP_CSV).unwrap();

        let err = Artifacts::load(&ArtifactPaths::in_dir(dir.path())).unwrap_err();
        match err {
            ArtifactError::Missing(path) => assert!(path.ends_with(MODEL_FILE)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_missing_class_map_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MODEL_FILE), MODEL_JSON).unwrap();

        let err = Artifacts::load(&ArtifactPaths::in_dir(dir.path())).unwrap_err();
        assert!(matches!(err, ArtifactError::Missing(path) if path.ends_with(CLASS_MAP_FILE)));
    }

    #[test]
    fn test_load_corrupt_model() {
        let dir = tempfile::tempdir().unwrap();
        write_bundled(dir.path());
        std::fs::write(dir.path().join(MODEL_FILE), b"{\"type\": \"KMeans\"}").unwrap();

        let err = Artifacts::load(&ArtifactPaths::in_dir(dir.path())).unwrap_err();
        assert!(matches!(err, ArtifactError::Classifier { .. }));
    }

    #[test]
    fn test_load_corrupt_class_map() {
        let dir = tempfile::tempdir().unwrap();
        write_bundled(dir.path());
        std::fs::write(dir.path().join(CLASS_MAP_FILE), "Class_Number,Class_Type\nx,Mammal\n")
            .unwrap();

        let err = Artifacts::load(&ArtifactPaths::in_dir(dir.path())).unwrap_err();
        assert!(matches!(err, ArtifactError::Mapping { .. }));
    }

    #[test]
    fn test_loaded_artifacts_outlive_files() {
        let dir = tempfile::tempdir().unwrap();
        write_bundled(dir.path());
        let artifacts = Artifacts::load(&ArtifactPaths::in_dir(dir.path())).unwrap();
        dir.close().unwrap();

        for _ in 0..100 {
            assert_eq!(predict(&artifacts, &mammal()).unwrap().label, "Mammal");
        }
    }

    #[test]
    fn test_paths_beside_executable() {
        let paths = ArtifactPaths::beside_executable().unwrap();
        let exe_dir = std::env::current_exe().unwrap();
        let exe_dir = exe_dir.parent().unwrap();
        assert_eq!(paths.model, exe_dir.join(MODEL_FILE));
        assert_eq!(paths.class_map, exe_dir.join(CLASS_MAP_FILE));
    }

    // ============================================================================
    // Prediction
    // ============================================================================

    #[test]
    fn test_predict_mammal() {
        let artifacts = bundled_artifacts();
        let prediction = predict(&artifacts, &mammal()).unwrap();

        assert_eq!(prediction.class_number, 1);
        assert_eq!(prediction.label, "Mammal");
        assert!((prediction.confidence - 40.0 / 41.0).abs() < 1e-12);
        assert_eq!(prediction.success_message(), "Predicted Animal Class: Mammal");
        assert_eq!(prediction.confidence_message(), "Prediction Confidence: 0.98");
    }

    #[test]
    fn test_predict_defaults() {
        let artifacts = bundled_artifacts();
        let prediction = predict(&artifacts, &FeatureRecord::default()).unwrap();
        assert_eq!(prediction.label, "Invertebrate");
        assert_eq!(format_confidence(prediction.confidence), "0.83");
    }

    #[test]
    fn test_predict_bird() {
        let record = FeatureRecord {
            feathers: 1,
            eggs: 1,
            airborne: 1,
            backbone: 1,
            breathes: 1,
            tail: 1,
            ..FeatureRecord::default()
        };
        let prediction = predict(&bundled_artifacts(), &record).unwrap();
        assert_eq!(prediction.label, "Bird");
        assert_eq!(format_confidence(prediction.confidence), "1.00");
    }

    #[test]
    fn test_predict_is_deterministic() {
        let artifacts = bundled_artifacts();
        let first = predict(&artifacts, &mammal()).unwrap();
        let second = predict(&artifacts, &mammal()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_confidence_is_max_of_normalised_distribution() {
        let artifacts = bundled_artifacts();
        let prediction = predict(&artifacts, &mammal()).unwrap();
        let total: f64 = prediction.probabilities.iter().map(|p| p.probability).sum();
        assert!((total - 1.0).abs() < 1e-9);
        let max = prediction
            .probabilities
            .iter()
            .map(|p| p.probability)
            .fold(0.0, f64::max);
        assert_eq!(prediction.confidence, max);
        assert!((0.0..=1.0).contains(&prediction.confidence));
    }

    #[test]
    fn test_predict_unknown_class_is_an_error() {
        let model = MLModel::from_json_slice(MODEL_JSON).unwrap();
        let class_map: ClassMapping = [(2, "Bird".to_string())].into_iter().collect();
        let artifacts = Artifacts::new(Arc::new(model), class_map, "partial");

        let err = predict(&artifacts, &mammal()).unwrap_err();
        assert!(matches!(err, PredictError::UnknownClass(1)));
    }

    #[test]
    fn test_predict_rejects_invalid_record() {
        let record = FeatureRecord {
            legs: 12,
            ..mammal()
        };
        let err = predict(&bundled_artifacts(), &record).unwrap_err();
        assert!(matches!(err, PredictError::Input(_)));
    }

    #[test]
    fn test_max_probability_checks_distribution() {
        assert_eq!(max_probability(&[0.25, 0.75]).unwrap(), 0.75);
        assert!(max_probability(&[]).is_err());
        assert!(max_probability(&[0.5, 0.2]).is_err());
        assert!(max_probability(&[1.5, -0.5]).is_err());
        assert!(max_probability(&[f64::NAN, 1.0]).is_err());
    }

    #[test]
    fn test_format_confidence_two_decimals() {
        assert_eq!(format_confidence(0.9375), "0.94");
        assert_eq!(format_confidence(1.0), "1.00");
        assert_eq!(format_confidence(0.0), "0.00");
    }
}
