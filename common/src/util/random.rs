use rand::{distributions::Alphanumeric, thread_rng, Rng};

const PREFIX_LEN: usize = 30;

pub fn random_alphanumeric(len: usize) -> String {
    thread_rng().sample_iter(&Alphanumeric).take(len).map(char::from).collect()
}

/// Storage key for an uploaded file, prefixed so equal file names never collide.
pub fn object_key(file_name: &str) -> String {
    let file_name = if file_name.is_empty() { "upload" } else { file_name };
    format!("{}/{}", random_alphanumeric(PREFIX_LEN), file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_prefixed_and_distinct() {
        let key = object_key("clip.mp4");
        let (prefix, name) = key.split_once('/').unwrap();
        assert_eq!(prefix.len(), PREFIX_LEN);
        assert!(prefix.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(name, "clip.mp4");
        assert_ne!(key, object_key("clip.mp4"));
    }

    #[test]
    fn empty_names_get_a_placeholder() {
        assert!(object_key("").ends_with("/upload"));
    }
}
