use async_trait::async_trait;
use slowlog_harvester::remote::{LogFileDescriptor, LogPortion, LogService, RemoteError};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// In-memory log service. Markers are `<page>:<byte offset>` and pages are
/// `page_size` bytes.
pub struct FakeLogService {
    files: Mutex<HashMap<String, Vec<(LogFileDescriptor, String)>>>,
    failing: Mutex<HashSet<String>>,
    requests: Mutex<Vec<(String, String)>>,
    page_size: usize,
}

#[allow(dead_code)]
impl FakeLogService {
    pub fn new(page_size: usize) -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            requests: Mutex::new(Vec::new()),
            page_size,
        }
    }

    pub fn put_file(&self, instance_id: &str, name: &str, last_written: i64, content: &str) {
        let mut files = self.files.lock().unwrap();
        let entry = files.entry(instance_id.to_string()).or_default();
        entry.retain(|(descriptor, _)| descriptor.name != name);
        entry.push((
            LogFileDescriptor {
                name: name.to_string(),
                last_written,
                size: content.len() as i64,
            },
            content.to_string(),
        ));
    }

    pub fn append(&self, instance_id: &str, name: &str, last_written: i64, more: &str) {
        let mut files = self.files.lock().unwrap();
        let entry = files.get_mut(instance_id).unwrap();
        let (descriptor, content) = entry
            .iter_mut()
            .find(|(descriptor, _)| descriptor.name == name)
            .unwrap();
        content.push_str(more);
        descriptor.size = content.len() as i64;
        descriptor.last_written = last_written;
    }

    pub fn fail_downloads_of(&self, name: &str) {
        self.failing.lock().unwrap().insert(name.to_string());
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }
}

#[async_trait]
impl LogService for FakeLogService {
    async fn describe_log_files(
        &self,
        instance_id: &str,
        filename_contains: &str,
    ) -> Result<Vec<LogFileDescriptor>, RemoteError> {
        let files = self.files.lock().unwrap();
        Ok(files
            .get(instance_id)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|(descriptor, _)| descriptor.name.contains(filename_contains))
                    .map(|(descriptor, _)| descriptor.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn download_portion(
        &self,
        instance_id: &str,
        log_file_name: &str,
        marker: &str,
    ) -> Result<LogPortion, RemoteError> {
        self.requests
            .lock()
            .unwrap()
            .push((log_file_name.to_string(), marker.to_string()));

        if self.failing.lock().unwrap().contains(log_file_name) {
            return Err(RemoteError::Generic("connection reset".to_string()));
        }

        let files = self.files.lock().unwrap();
        let content = files
            .get(instance_id)
            .and_then(|entries| {
                entries
                    .iter()
                    .find(|(descriptor, _)| descriptor.name == log_file_name)
            })
            .map(|(_, content)| content.clone())
            .ok_or_else(|| RemoteError::Status {
                status: 404,
                message: format!("{} not found", log_file_name),
            })?;

        let (page, offset) = marker
            .split_once(':')
            .map(|(page, offset)| {
                (
                    page.parse::<usize>().unwrap_or(0),
                    offset.parse::<usize>().unwrap_or(0),
                )
            })
            .unwrap_or((0, 0));

        let start = offset.min(content.len());
        let end = (start + self.page_size).min(content.len());

        Ok(LogPortion {
            data: Some(content[start..end].to_string()),
            marker: Some(format!("{}:{}", page + 1, end)),
            additional_data_pending: end < content.len(),
        })
    }
}

/// A slow log entry as the database writes it.
pub fn entry(user: &str, query: &str) -> String {
    format!(
        "# Time: 2024-01-02T03:04:05.000000Z\n\
         # User@Host: {user}[{user}] @  [10.0.0.5]  Id:    11\n\
         # Query_time: 1.500000  Lock_time: 0.000010 Rows_sent: 3  Rows_examined: 300\n\
         SET timestamp=1704164645;\n\
         {query};\n"
    )
}
