pub(crate) const ENTRIES: &[(&str, &str)] = &[
    ("UPLOAD_FAILED", "Upload failed"),
    ("CHECK_SETTINGS", "Please check your settings"),
    ("CHECK_SETTINGS_AND_NETWORK", "Please check your settings and network"),
    ("PLUGIN_NOT_FOUND", "Picture bed ${name} is not registered"),
    // Ali-cloud
    ("PICBED_ALICLOUD", "Ali Cloud"),
    ("PICBED_ALICLOUD_ACCESSKEYID", "Set KeyId"),
    ("PICBED_ALICLOUD_ACCESSKEYSECRET", "Set KeySecret"),
    ("PICBED_ALICLOUD_BUCKET", "Set Bucket"),
    ("PICBED_ALICLOUD_AREA", "Set Area"),
    ("PICBED_ALICLOUD_PATH", "Set Path"),
    ("PICBED_ALICLOUD_CUSTOMURL", "Set Custom URL"),
    ("PICBED_ALICLOUD_OPTIONS", "Set URL Suffix"),
    // GitHub
    ("PICBED_GITHUB", "GitHub"),
    ("PICBED_GITHUB_TOKEN", "Set Token"),
    ("PICBED_GITHUB_REPO", "Set Repo Name"),
    ("PICBED_GITHUB_PATH", "Set Path"),
    ("PICBED_GITHUB_BRANCH", "Set Branch"),
    ("PICBED_GITHUB_CUSTOMURL", "Set Custom URL"),
    // internal
    ("PICBED_INTERNAL", "Internal"),
    ("PICBED_INTERNAL_URL", "Internal URL"),
    ("PICBED_INTERNAL_VERSION", "Internal Version"),
    ("PICBED_INTERNAL_TOKEN", "Internal Token"),
];
