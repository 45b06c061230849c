//! # Storage-bucket consumer records.
//!
//! We only publish the bucket name we want provisioned; the provider answers
//! with an endpoint and a credentials secret reference, which the
//! desired-state builder folds into the workload environment.

use std::collections::BTreeMap;

use crate::model::fields;
use crate::publish::PublishInputs;

/// Builds the bucket-consumer record: `{requested-bucket-name}`.
///
/// The requested name comes from options; without validated options there is
/// nothing trustworthy to request.
pub(super) fn record(inputs: &PublishInputs<'_>) -> Option<BTreeMap<String, String>> {
    let options = inputs.options?;

    let mut record = BTreeMap::new();
    record.insert(
        fields::REQUESTED_BUCKET_NAME.into(),
        options.bucket_name(inputs.identity),
    );
    Some(record)
}
