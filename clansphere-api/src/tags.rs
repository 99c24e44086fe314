/// Response of the `get_taglist` service. Tags come back sorted
/// case-insensitively by the server.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TagList {
    pub tags: Vec<String>,
}

service!("get_taglist" => TagList);
