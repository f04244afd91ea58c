//! Wire names shared with the question service.

pub const QUERY_QUESTION_TYPE: &str = "questionType";
pub const QUERY_FIRM_ID: &str = "firmID";
pub const QUERY_CURRENT_TIMESTAMP: &str = "currentTimestamp";
pub const QUERY_DIGITAL_SIGNATURE: &str = "digitalSignature";

/// Envelope status meaning success.
pub const STATUS_SUCCESS: i64 = 0;

/// `remainTimes` value meaning the key has no call limit.
pub const REMAIN_TIMES_UNLIMITED: i64 = -1;
