// Copyright 2025 Cowboy AI, LLC.

//! Batch envelopes delivered by the host runtime
//!
//! Field names follow the JSON the event sources emit. Everything the adapters do
//! not read is optional and defaults when absent.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Queue message batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SqsEvent {
    /// Messages in delivery order
    #[serde(rename = "Records", default)]
    pub records: Vec<SqsMessage>,
}

/// One queue message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SqsMessage {
    /// Queue-assigned message id
    pub message_id: String,
    /// Handle used to delete the message
    pub receipt_handle: String,
    /// Message payload
    pub body: String,
    /// MD5 digest of the body
    pub md5_of_body: String,
    /// System attributes
    pub attributes: HashMap<String, String>,
    /// Source service, e.g. `aws:sqs`
    pub event_source: String,
    /// Identifier of the source queue
    #[serde(rename = "eventSourceARN")]
    pub event_source_arn: String,
    /// Region the queue lives in
    pub aws_region: String,
}

/// Notification batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnsEvent {
    /// Notifications in delivery order
    #[serde(rename = "Records", default)]
    pub records: Vec<SnsEventRecord>,
}

/// One notification delivery
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnsEventRecord {
    /// Envelope version
    #[serde(rename = "EventVersion")]
    pub event_version: String,
    /// Subscription that delivered the notification
    #[serde(rename = "EventSubscriptionArn")]
    pub event_subscription_arn: String,
    /// Source service, e.g. `aws:sns`
    #[serde(rename = "EventSource")]
    pub event_source: String,
    /// The notification itself
    #[serde(rename = "Sns")]
    pub sns: SnsEntity,
}

/// Notification body and its topic
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SnsEntity {
    /// Topic-assigned message id
    pub message_id: String,
    /// Notification type
    #[serde(rename = "Type")]
    pub kind: String,
    /// Identifier of the source topic
    pub topic_arn: String,
    /// Optional subject line
    pub subject: String,
    /// Message payload
    pub message: String,
    /// Publish time
    pub timestamp: Option<DateTime<Utc>>,
}

/// Change-stream batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DynamoDbEvent {
    /// Stream records in shard order
    #[serde(rename = "Records", default)]
    pub records: Vec<DynamoDbEventRecord>,
}

/// One change-stream entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DynamoDbEventRecord {
    /// Unique record identifier
    #[serde(rename = "eventID")]
    pub event_id: String,
    /// `INSERT`, `MODIFY` or `REMOVE`
    pub event_name: String,
    /// Source service, e.g. `aws:dynamodb`
    pub event_source: String,
    /// Stream identifier
    #[serde(rename = "eventSourceARN")]
    pub event_source_arn: String,
    /// Region of the table
    pub aws_region: String,
    /// Changed item
    pub dynamodb: StreamRecord,
}

/// Item images carried by a change-stream entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StreamRecord {
    /// Primary key attributes
    pub keys: HashMap<String, serde_json::Value>,
    /// Item after the change
    pub new_image: HashMap<String, serde_json::Value>,
    /// Item before the change
    pub old_image: HashMap<String, serde_json::Value>,
    /// Position in the shard
    pub sequence_number: String,
    /// Size of the record in bytes
    pub size_bytes: i64,
    /// Which images the stream carries
    pub stream_view_type: String,
}

/// Object-storage notification batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct S3Event {
    /// Notifications in delivery order
    #[serde(rename = "Records", default)]
    pub records: Vec<S3EventRecord>,
}

/// One object-storage notification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct S3EventRecord {
    /// Envelope version
    pub event_version: String,
    /// Source service, e.g. `aws:s3`
    pub event_source: String,
    /// Region of the bucket
    pub aws_region: String,
    /// When the event happened
    pub event_time: Option<DateTime<Utc>>,
    /// What happened, e.g. `ObjectCreated:Put`
    pub event_name: String,
    /// Bucket and object the event names
    pub s3: S3Entity,
}

/// Bucket and object named by a notification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct S3Entity {
    /// Notification schema version
    pub s3_schema_version: String,
    /// Notification configuration that fired
    pub configuration_id: String,
    /// Containing bucket
    pub bucket: S3Bucket,
    /// Object within the bucket
    pub object: S3Object,
}

/// Bucket identity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct S3Bucket {
    /// Bucket name
    pub name: String,
    /// Bucket identifier
    pub arn: String,
}

/// Object identity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct S3Object {
    /// Object key
    pub key: String,
    /// Object size in bytes
    pub size: i64,
    /// Entity tag
    #[serde(rename = "eTag")]
    pub etag: String,
    /// Version, empty when the bucket is unversioned
    pub version_id: String,
    /// Ordering token for events on the same key
    pub sequencer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqs_event_field_names() {
        let raw = r#"{"Records":[{"messageId":"m1","body":"hello","eventSourceARN":"arn:aws:sqs:eu-west-1:1:q"}]}"#;
        let event: SqsEvent = serde_json::from_str(raw).unwrap();

        assert_eq!(event.records.len(), 1);
        assert_eq!(event.records[0].message_id, "m1");
        assert_eq!(event.records[0].body, "hello");
        assert_eq!(event.records[0].event_source_arn, "arn:aws:sqs:eu-west-1:1:q");
        assert!(event.records[0].attributes.is_empty());
    }

    #[test]
    fn test_sns_event_field_names() {
        let raw = r#"{"Records":[{"EventSource":"aws:sns","Sns":{"TopicArn":"arn:aws:sns:eu-west-1:1:t","Message":"1","Type":"Notification","Timestamp":"2024-01-02T03:04:05Z"}}]}"#;
        let event: SnsEvent = serde_json::from_str(raw).unwrap();

        let sns = &event.records[0].sns;
        assert_eq!(sns.topic_arn, "arn:aws:sns:eu-west-1:1:t");
        assert_eq!(sns.message, "1");
        assert_eq!(sns.kind, "Notification");
        assert!(sns.timestamp.is_some());
    }

    #[test]
    fn test_s3_event_field_names() {
        let raw = r#"{"Records":[{"eventName":"ObjectCreated:Put","s3":{"bucket":{"name":"b"},"object":{"key":"k","versionId":"v1","eTag":"e"}}}]}"#;
        let event: S3Event = serde_json::from_str(raw).unwrap();

        let record = &event.records[0];
        assert_eq!(record.event_name, "ObjectCreated:Put");
        assert_eq!(record.s3.bucket.name, "b");
        assert_eq!(record.s3.object.key, "k");
        assert_eq!(record.s3.object.version_id, "v1");
        assert_eq!(record.s3.object.etag, "e");
    }

    #[test]
    fn test_dynamodb_event_field_names() {
        let raw = r#"{"Records":[{"eventID":"1","eventName":"INSERT","dynamodb":{"Keys":{"Id":{"S":"a"}},"SequenceNumber":"100"}}]}"#;
        let event: DynamoDbEvent = serde_json::from_str(raw).unwrap();

        let record = &event.records[0];
        assert_eq!(record.event_id, "1");
        assert_eq!(record.event_name, "INSERT");
        assert_eq!(record.dynamodb.sequence_number, "100");
        assert!(record.dynamodb.keys.contains_key("Id"));
    }

    #[test]
    fn test_missing_records_is_empty_batch() {
        let event: SqsEvent = serde_json::from_str("{}").unwrap();
        assert!(event.records.is_empty());
    }
}
