//! IO utilities for binarized dataset text files.

pub mod dataset;

pub use dataset::{
    read_classification_file, read_feature_file, read_target_file, write_classification_file,
    write_feature_file, write_target_file,
};
