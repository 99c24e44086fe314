/// Response of the `get_comment` service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i32,
    pub parent: Option<i32>,
    pub body: String,
    pub author: String,
    /// Only present when the requesting user may manage comments.
    pub email: Option<String>,
    /// Unix timestamp.
    pub pub_date: i64,
}

service!("get_comment" => Comment);
