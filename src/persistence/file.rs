use super::{DocumentStore, PersistenceResult};
use crate::host::ProjectDocument;
use crate::{ResourceView, TaskView};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Stores the whole document as one pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonDocumentStore {
    path: PathBuf,
}

impl JsonDocumentStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DocumentStore for JsonDocumentStore {
    fn save_document(&self, document: &ProjectDocument) -> PersistenceResult<()> {
        super::validate_document(document)?;
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(file, document)?;
        Ok(())
    }

    fn load_document(&self) -> PersistenceResult<Option<ProjectDocument>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let file = File::open(&self.path)?;
        let document: ProjectDocument = serde_json::from_reader(file)?;
        super::validate_document(&document)?;
        Ok(Some(document))
    }
}

#[derive(Serialize, Deserialize)]
struct TaskCsvRecord {
    id: i32,
    outline_number: String,
    outline_level: u32,
    name: String,
    start: String,
    finish: String,
    warehouse: String,
    manager: String,
    resources: String,
}

impl From<&TaskView> for TaskCsvRecord {
    fn from(task: &TaskView) -> Self {
        Self {
            id: task.id,
            outline_number: task.outline_number.clone(),
            outline_level: task.outline_level,
            name: task.name.clone(),
            start: format_date(task.start),
            finish: format_date(task.finish),
            warehouse: task.warehouse.clone().unwrap_or_default(),
            manager: task.manager.clone().unwrap_or_default(),
            resources: task.resources.join(";"),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ResourceCsvRecord {
    id: i32,
    name: String,
    category: String,
    warehouse: String,
    model: String,
    pitch: String,
    center_to_center: String,
    diameter: String,
    max: String,
    notes: String,
}

impl From<&ResourceView> for ResourceCsvRecord {
    fn from(resource: &ResourceView) -> Self {
        Self {
            id: resource.id,
            name: resource.name.clone(),
            category: resource
                .category
                .map(|c| c.as_str().to_string())
                .unwrap_or_default(),
            warehouse: resource.warehouse.clone().unwrap_or_default(),
            model: resource.model.clone().unwrap_or_default(),
            pitch: format_option_f64(resource.pitch),
            center_to_center: format_option_f64(resource.center_to_center),
            diameter: format_option_f64(resource.diameter),
            max: format_option_f64(resource.max),
            notes: resource.notes.clone().unwrap_or_default(),
        }
    }
}

pub fn export_tasks_to_csv<P: AsRef<Path>>(tasks: &[TaskView], path: P) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for task in tasks {
        writer.serialize(TaskCsvRecord::from(task))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_resources_to_csv<P: AsRef<Path>>(
    resources: &[ResourceView],
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for resource in resources {
        writer.serialize(ResourceCsvRecord::from(resource))?;
    }
    writer.flush()?;
    Ok(())
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn format_option_f64(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
