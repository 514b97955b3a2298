//! Tabular views of tasks and resources as polars data frames.

use chrono::NaiveDate;
use polars::prelude::PlSmallStr;
use polars::prelude::*;

use crate::{ResourceView, TaskView};

pub fn tasks_frame(tasks: &[TaskView]) -> PolarsResult<DataFrame> {
    let ids: Vec<i32> = tasks.iter().map(|t| t.id).collect();
    let outline: Vec<&str> = tasks.iter().map(|t| t.outline_number.as_str()).collect();
    let levels: Vec<i32> = tasks.iter().map(|t| t.outline_level as i32).collect();
    let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
    let warehouses: Vec<Option<&str>> = tasks.iter().map(|t| t.warehouse.as_deref()).collect();
    let managers: Vec<Option<&str>> = tasks.iter().map(|t| t.manager.as_deref()).collect();
    let resources: Vec<String> = tasks.iter().map(|t| t.resources.join(", ")).collect();

    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("id"), ids).into_column(),
        Series::new(PlSmallStr::from_static("outline"), outline).into_column(),
        Series::new(PlSmallStr::from_static("level"), levels).into_column(),
        Series::new(PlSmallStr::from_static("name"), names).into_column(),
        date_series("start", tasks.iter().map(|t| t.start))?.into_column(),
        date_series("finish", tasks.iter().map(|t| t.finish))?.into_column(),
        Series::new(PlSmallStr::from_static("warehouse"), warehouses).into_column(),
        Series::new(PlSmallStr::from_static("manager"), managers).into_column(),
        Series::new(PlSmallStr::from_static("resources"), resources).into_column(),
    ])
}

pub fn resources_frame(resources: &[ResourceView]) -> PolarsResult<DataFrame> {
    let ids: Vec<i32> = resources.iter().map(|r| r.id).collect();
    let names: Vec<&str> = resources.iter().map(|r| r.name.as_str()).collect();
    let categories: Vec<Option<&str>> = resources
        .iter()
        .map(|r| r.category.map(|c| c.as_str()))
        .collect();
    let warehouses: Vec<Option<&str>> = resources.iter().map(|r| r.warehouse.as_deref()).collect();
    let models: Vec<Option<&str>> = resources.iter().map(|r| r.model.as_deref()).collect();
    let pitch: Vec<Option<f64>> = resources.iter().map(|r| r.pitch).collect();
    let center_to_center: Vec<Option<f64>> = resources.iter().map(|r| r.center_to_center).collect();
    let diameter: Vec<Option<f64>> = resources.iter().map(|r| r.diameter).collect();
    let max: Vec<Option<f64>> = resources.iter().map(|r| r.max).collect();
    let notes: Vec<Option<&str>> = resources.iter().map(|r| r.notes.as_deref()).collect();

    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("id"), ids).into_column(),
        Series::new(PlSmallStr::from_static("name"), names).into_column(),
        Series::new(PlSmallStr::from_static("category"), categories).into_column(),
        Series::new(PlSmallStr::from_static("warehouse"), warehouses).into_column(),
        Series::new(PlSmallStr::from_static("model"), models).into_column(),
        Series::new(PlSmallStr::from_static("pitch"), pitch).into_column(),
        Series::new(PlSmallStr::from_static("center_to_center"), center_to_center).into_column(),
        Series::new(PlSmallStr::from_static("diameter"), diameter).into_column(),
        Series::new(PlSmallStr::from_static("max"), max).into_column(),
        Series::new(PlSmallStr::from_static("notes"), notes).into_column(),
    ])
}

fn date_series<I>(name: &'static str, dates: I) -> PolarsResult<Series>
where
    I: Iterator<Item = Option<NaiveDate>>,
{
    let days: Vec<Option<i32>> = dates.map(|d| d.map(date_to_i32)).collect();
    Series::new(PlSmallStr::from_static(name), days).cast(&DataType::Date)
}

fn date_to_i32(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    (date - epoch).num_days() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResourceCategory;

    #[test]
    fn tasks_frame_has_one_row_per_task() {
        let task = TaskView {
            id: 3,
            name: "Assembly".into(),
            outline_level: 2,
            outline_number: "1.1".into(),
            start: NaiveDate::from_ymd_opt(2025, 1, 6),
            finish: None,
            warehouse: Some("WH1".into()),
            manager: None,
            resources: vec!["R1".into(), "R2".into()],
        };
        let df = tasks_frame(&[task]).unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.column("id").unwrap().i32().unwrap().get(0), Some(3));
        assert_eq!(df.column("resources").unwrap().str().unwrap().get(0), Some("R1, R2"));
        assert_eq!(df.column("finish").unwrap().date().unwrap().get(0), None);
    }

    #[test]
    fn resources_frame_keeps_unset_numbers_null() {
        let resource = ResourceView {
            id: 1,
            name: "R1".into(),
            category: Some(ResourceCategory::Tastatore),
            warehouse: Some("WH2".into()),
            model: None,
            pitch: None,
            center_to_center: None,
            diameter: Some(12.5),
            max: None,
            notes: None,
        };
        let df = resources_frame(&[resource]).unwrap();
        assert_eq!(df.column("diameter").unwrap().f64().unwrap().get(0), Some(12.5));
        assert_eq!(df.column("pitch").unwrap().f64().unwrap().get(0), None);
        assert_eq!(df.column("category").unwrap().str().unwrap().get(0), Some("Tastatore"));
    }
}
