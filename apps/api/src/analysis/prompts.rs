pub fn build_analysis_prompt(resume_json: &str, job_description: &str) -> String {
    format!(
        r#"Analyze the following resume against the job description.

RESUME:
{resume_json}

JOB DESCRIPTION:
{job_description}

Return a JSON object with exactly this structure:
{{
  "keyword_alignment": {{
    "missing_keywords": ["keywords from the job description the resume never mentions"],
    "suggestions": ["where and how to work them in"]
  }},
  "achievement_improvements": [
    {{
      "section": "experience | education | projects",
      "current": "the original text",
      "suggested": "a stronger rewrite with concrete metrics"
    }}
  ],
  "skills_feedback": {{
    "relevant_skills": [],
    "missing_skills": [],
    "suggestions": []
  }},
  "overall_recommendations": []
}}

Only suggest improvements supported by the resume content. Do not invent experience."#
    )
}

pub fn build_job_titles_prompt(resume_json: &str) -> String {
    format!(
        r#"You are an expert career counselor. Based on this resume, suggest 5 job titles
the candidate should consider applying for.

RESUME:
{resume_json}

Return a JSON object: {{"job_titles": ["title", ...]}}"#
    )
}
